use criterion::{criterion_group, criterion_main, Criterion};
use std::sync::Arc;

use service::auth::domain::UserRecord;
use service::auth::password::hash_password;
use service::auth::token::TokenConfig;
use service::auth::{InMemoryCredentialStore, JwtTokenIssuer, LoginHandler, LoginRequest};

fn bench_login(c: &mut Criterion) {
    let store = InMemoryCredentialStore::with_users([UserRecord {
        full_name: "Bench".into(),
        email: "bench@example.com".into(),
        password_hash: hash_password("Benchmark1").unwrap(),
        phone: None,
    }])
    .unwrap();
    let issuer = JwtTokenIssuer::new(TokenConfig {
        secret: "bench-secret-0123456789".into(),
        issuer: "login-service".into(),
        access_ttl: chrono::Duration::minutes(15),
        refresh_length: 64,
    });
    let handler = LoginHandler::new(Arc::new(store), Arc::new(issuer));
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("auth_login_verify", |b| {
        b.iter(|| {
            let r = rt.block_on(handler.handle(LoginRequest::new("bench@example.com", "Benchmark1"))).unwrap();
            assert!(r.succeeded);
        });
    });

    // Should land close to the unknown-account case below.
    c.bench_function("auth_login_wrong_password", |b| {
        b.iter(|| {
            let r = rt.block_on(handler.handle(LoginRequest::new("bench@example.com", "Wrong-pass1"))).unwrap();
            assert!(!r.succeeded);
        });
    });

    c.bench_function("auth_login_unknown_account", |b| {
        b.iter(|| {
            let r = rt.block_on(handler.handle(LoginRequest::new("ghost@example.com", "Benchmark1"))).unwrap();
            assert!(!r.succeeded);
        });
    });
}

criterion_group!(benches, bench_login);
criterion_main!(benches);
