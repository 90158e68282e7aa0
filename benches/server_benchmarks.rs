use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::path::Path;
use wasmserve::config::Config;
use wasmserve::server::static_files;

fn bench_config_creation(c: &mut Criterion) {
    c.bench_function("config_creation", |b| {
        b.iter(|| {
            let config = Config::default();
            black_box(config);
        })
    });
}

fn bench_config_validation(c: &mut Criterion) {
    let config = Config::default();

    c.bench_function("config_validation", |b| {
        b.iter(|| {
            let result = config.validate();
            black_box(result);
        })
    });
}

fn bench_listen_addresses_parsing(c: &mut Criterion) {
    let mut config = Config::default();
    config.server.listen = vec![
        "127.0.0.1:8081".to_string(),
        "0.0.0.0:8082".to_string(),
        "192.168.1.1:9090".to_string(),
    ];

    c.bench_function("listen_addresses_parsing", |b| {
        b.iter(|| {
            let addresses = config.listen_addresses().unwrap();
            black_box(addresses);
        })
    });
}

fn bench_path_sanitization(c: &mut Criterion) {
    c.bench_function("path_sanitization", |b| {
        b.iter(|| {
            let result = static_files::sanitize_path(black_box("/assets/nested/game.wasm"));
            black_box(result);
        })
    });
}

fn bench_content_type_lookup(c: &mut Criterion) {
    let paths = [
        Path::new("game.wasm"),
        Path::new("index.html"),
        Path::new("style.css"),
        Path::new("unknown.xyzzy"),
    ];

    c.bench_function("content_type_lookup", |b| {
        b.iter(|| {
            for path in &paths {
                let mime = static_files::content_type_for(black_box(path));
                black_box(mime);
            }
        })
    });
}

criterion_group!(
    benches,
    bench_config_creation,
    bench_config_validation,
    bench_listen_addresses_parsing,
    bench_path_sanitization,
    bench_content_type_lookup
);

criterion_main!(benches);
