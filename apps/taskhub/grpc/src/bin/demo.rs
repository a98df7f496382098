//! Walks through the gRPC API against a running server.
//!
//! `TASKHUB_GRPC_ADDR` (default `http://127.0.0.1:50051`), `DEMO_USERNAME`
//! and `DEMO_PASSWORD` control the target and the account used.

use chrono::{Duration, Utc};
use core_config::tracing::{init_tracing, install_color_eyre};
use core_config::{Environment, env_or_default};
use domain_tasks::{CreateTask, TaskStatus, UpdateTask};
use domain_users::RegisterUser;
use eyre::WrapErr;
use taskhub_grpc::TaskhubClient;
use tonic::Code;
use tracing::info;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();
    init_tracing(&Environment::from_env());

    let addr = env_or_default("TASKHUB_GRPC_ADDR", "http://127.0.0.1:50051");
    let username = env_or_default("DEMO_USERNAME", "demo");
    let password = env_or_default("DEMO_PASSWORD", "demo-password");

    let mut client = TaskhubClient::connect(addr.clone())
        .await
        .wrap_err_with(|| format!("Failed to connect to {}", addr))?;

    match client
        .register(RegisterUser {
            username: username.clone(),
            email: format!("{}@example.com", username),
            password: password.clone(),
            first_name: None,
            last_name: None,
        })
        .await
    {
        Ok(user) => info!(user_id = %user.id, "registered {}", user.username),
        Err(status) if status.code() == Code::AlreadyExists => {
            info!("{} already registered", username)
        }
        Err(status) => return Err(status).wrap_err("Register failed"),
    }

    let token = client.login(&username, &password).await.wrap_err("Login failed")?;
    info!(expires_at = %token.expires_at, "logged in as {}", token.username);
    client.set_auth_token(token.access_token.clone());

    let task = client
        .create_task(CreateTask {
            title: "Try the gRPC API".to_string(),
            description: Some("Created by the demo client".to_string()),
            priority: 3,
            due_date: Some(Utc::now() + Duration::days(7)),
        })
        .await
        .wrap_err("CreateTask failed")?;
    info!(task_id = %task.id, "created \"{}\"", task.title);

    let tasks = client.list_tasks(None).await.wrap_err("ListTasks failed")?;
    info!("{} task(s) in total", tasks.len());
    for (i, t) in tasks.iter().enumerate() {
        info!("{}. {} (status: {}, priority: {})", i + 1, t.title, t.status, t.priority);
    }

    let task = client
        .update_task(
            task.id,
            UpdateTask {
                status: Some(TaskStatus::InProgress),
                ..Default::default()
            },
        )
        .await
        .wrap_err("UpdateTask failed")?;
    info!(task_id = %task.id, status = %task.status, "task updated");

    let validation = client
        .validate_token(&token.access_token)
        .await
        .wrap_err("ValidateToken failed")?;
    if validation.valid {
        info!("token is valid for {} ({:?})", validation.username, validation.user_id);
    } else {
        info!("token is invalid");
    }

    Ok(())
}
