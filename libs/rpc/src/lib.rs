//! Protobuf contract for the taskhub gRPC services.
//!
//! The schema lives in `proto/taskhub/v1/taskhub.proto`. The Rust code under
//! `src/generated` is generated from it with prost and tonic, then checked in.

pub mod taskhub {
    pub mod v1 {
        include!("generated/taskhub/v1/taskhub.v1.rs");
    }
}
