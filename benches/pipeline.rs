//! Benchmarks for the lazysprite pipeline.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{Rgba, RgbaImage};
use tempfile::TempDir;

use lazysprite::asset::Asset;
use lazysprite::pipeline::group_hash;
use lazysprite::render::Packer;
use lazysprite::{AtRule, Config, Lazysprite, LogLevel, Node, ShelfPacker, SpriteCache, Stylesheet};

/// A slice directory with `count` small icons, half of them with retina variants.
fn icon_fixture(count: u32) -> TempDir {
    let dir = TempDir::new().unwrap();
    let icons = dir.path().join("slice/icons");
    fs::create_dir_all(&icons).unwrap();

    for i in 0..count {
        let colour = Rgba([(i * 7 % 256) as u8, (i * 13 % 256) as u8, 128, 255]);
        RgbaImage::from_pixel(16, 16, colour)
            .save(icons.join(format!("icon-{i}.png")))
            .unwrap();
        if i % 2 == 0 {
            RgbaImage::from_pixel(32, 32, colour)
                .save(icons.join(format!("icon-{i}@2x.png")))
                .unwrap();
        }
    }
    dir
}

fn config() -> Config {
    Config {
        sprite_path: "dist/sprites".into(),
        stylesheet_relative: Some("dist/css".into()),
        log_level: LogLevel::Silent,
        ..Config::new("slice")
    }
}

fn stylesheet() -> Stylesheet {
    Stylesheet::new(vec![Node::AtRule(AtRule::new("lazysprite", "\"icons\""))])
}

fn assets(root: &Path) -> Vec<Asset> {
    let icons = root.join("slice/icons");
    let mut paths: Vec<_> = fs::read_dir(&icons)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    paths.sort();
    paths
        .into_iter()
        .filter_map(|p| Asset::new(p, &icons, root, None, "__"))
        .collect()
}

// -- Hashing and packing --

fn bench_sheets(c: &mut Criterion) {
    let mut group = c.benchmark_group("sheets");
    let fixture = icon_fixture(64);
    let assets = assets(fixture.path());
    let refs: Vec<&Asset> = assets.iter().collect();
    let standard: Vec<_> = assets
        .iter()
        .filter(|a| !a.is_retina())
        .map(|a| a.path.clone())
        .collect();

    group.bench_function("group_hash_96", |b| {
        b.iter(|| group_hash(black_box(&refs)).unwrap())
    });

    group.bench_function("shelf_pack_64", |b| {
        b.iter(|| ShelfPacker::new().pack(black_box(&standard), 10).unwrap())
    });

    group.finish();
}

// -- Full compiles --

fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile");
    let fixture = icon_fixture(32);

    group.bench_function("cold", |b| {
        b.iter(|| {
            let pipeline = Lazysprite::with_root(config(), fixture.path())
                .unwrap()
                .cache(Arc::new(SpriteCache::new()));
            let mut sheet = stylesheet();
            pipeline.process(black_box(&mut sheet)).unwrap()
        })
    });

    let cached = Lazysprite::with_root(config(), fixture.path())
        .unwrap()
        .cache(Arc::new(SpriteCache::new()));
    cached.process(&mut stylesheet()).unwrap();

    group.bench_function("cached", |b| {
        b.iter(|| {
            let mut sheet = stylesheet();
            cached.process(black_box(&mut sheet)).unwrap()
        })
    });

    group.finish();
}

criterion_group!(benches, bench_sheets, bench_compile);
criterion_main!(benches);
