use mongodb::{Database, bson::doc};

/// Round-trips a `ping` to the server. The error string is what `/ready` reports.
pub async fn check_health(db: &Database) -> Result<(), String> {
    db.run_command(doc! { "ping": 1 }).await.map(|_| ()).map_err(|e| {
        tracing::warn!(database = %db.name(), error = %e, "MongoDB ping failed");
        e.to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::Client;

    #[tokio::test]
    #[ignore = "requires a running MongoDB"]
    async fn test_ping() {
        let url = std::env::var("MONGODB_URL").unwrap_or_else(|_| "mongodb://localhost:27017".into());
        let client = Client::with_uri_str(url).await.unwrap();
        assert!(check_health(&client.database("taskhub_test")).await.is_ok());
    }
}
