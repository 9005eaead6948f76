//! Offline keyword classifier
//!
//! Deterministic [`ChunkClassifier`] that looks for well-known library and
//! API names in a chunk. Used when no model-backed classifier is configured.

use crate::error::Result;
use crate::oracle::{ChunkAnalysis, ChunkClassifier, FeatureFinding};

/// Lower-cased code fragments that indicate each code feature
pub const CODE_PATTERNS: &[(&str, &[&str])] = &[
    (
        "authentication",
        &["passport", "jsonwebtoken", "jwt", "oauth", "bcrypt", "next-auth", "auth0", "login("],
    ),
    (
        "realtime_events",
        &["socket.io", "websocket", "new eventsource", "pusher", "ws://", "wss://"],
    ),
    (
        "storage",
        &["s3client", "aws-sdk/client-s3", "multer", "@google-cloud/storage", "blob_storage", "putobject"],
    ),
    ("caching", &["redis", "memcached", "node-cache", "lru-cache", "ioredis"]),
    (
        "ai_implementation",
        &["openai", "anthropic", "langchain", "huggingface", "tensorflow", "torch"],
    ),
    (
        "database",
        &["mongoose", "prisma", "sequelize", "typeorm", "postgres", "mysql", "sqlite", "mongodb", "knex"],
    ),
    (
        "microservices",
        &["grpc", "service-discovery", "consul", "api-gateway", "@nestjs/microservices"],
    ),
    ("monolith", &["express()", "app.listen(", "django", "rails", "laravel"]),
    (
        "api_exposed",
        &["app.get(", "app.post(", "router.", "@app.route", "fastapi", "graphql", "openapi"],
    ),
    (
        "message_queues",
        &["amqplib", "rabbitmq", "kafkajs", "kafka", "sqs", "nats", "bullmq"],
    ),
    (
        "background_jobs",
        &["node-cron", "cron.schedule", "agenda", "bull", "celery", "setinterval(", "worker_threads"],
    ),
    (
        "sensitive_data",
        &["password", "credit_card", "ssn", "encrypt(", "crypto.createcipher", "stripe"],
    ),
    (
        "external_apis",
        &["axios", "fetch(", "node-fetch", "requests.get", "stripe", "twilio", "sendgrid"],
    ),
];

/// Case-insensitive keyword matcher over [`CODE_PATTERNS`]
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordClassifier;

impl KeywordClassifier {
    pub fn new() -> Self {
        Self
    }
}

impl ChunkClassifier for KeywordClassifier {
    fn classify(&self, chunk: &str) -> Result<ChunkAnalysis> {
        let text = chunk.to_lowercase();
        let mut analysis = ChunkAnalysis::default();

        for (feature, patterns) in CODE_PATTERNS {
            let matched: Vec<&str> = patterns
                .iter()
                .copied()
                .filter(|pattern| text.contains(pattern))
                .collect();
            let finding = if matched.is_empty() {
                FeatureFinding::default()
            } else {
                FeatureFinding::present(format!("uses {}", matched.join(", ")))
            };
            analysis.set(*feature, finding);
        }

        Ok(analysis)
    }
}
