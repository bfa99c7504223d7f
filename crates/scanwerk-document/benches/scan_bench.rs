// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the scanwerk-document crate. Covers the full scan
// of a synthetic skewed page and the cheap path taken by a blank frame.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::draw_polygon_mut;
use imageproc::point::Point;

use scanwerk_document::{DocumentScanner, Frame};

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Full scan of a 320x240 frame holding a slightly skewed white page on a
/// dark background. Exercises every stage through perspective rectification.
fn bench_scan_skewed_page(c: &mut Criterion) {
    let mut img = RgbImage::from_pixel(320, 240, Rgb([30, 30, 30]));
    let page = [
        Point::new(70, 40),
        Point::new(250, 55),
        Point::new(240, 205),
        Point::new(60, 190),
    ];
    draw_polygon_mut(&mut img, &page, Rgb([240, 240, 240]));
    let frame = Frame::from_dynamic(DynamicImage::ImageRgb8(img));
    let scanner = DocumentScanner::default();

    c.bench_function("scan skewed page (320x240)", |b| {
        b.iter(|| {
            let outcome = scanner.scan(black_box(&frame));
            black_box(outcome.ok());
        });
    });
}

/// A uniform frame produces no edges, so the scan stops after the edge map.
fn bench_scan_blank_frame(c: &mut Criterion) {
    let frame = Frame::from_dynamic(DynamicImage::ImageRgb8(RgbImage::from_pixel(
        320,
        240,
        Rgb([255, 255, 255]),
    )));
    let scanner = DocumentScanner::default();

    c.bench_function("scan blank frame (320x240)", |b| {
        b.iter(|| black_box(scanner.scan(black_box(&frame)).ok()));
    });
}

criterion_group!(benches, bench_scan_skewed_page, bench_scan_blank_frame);
criterion_main!(benches);
