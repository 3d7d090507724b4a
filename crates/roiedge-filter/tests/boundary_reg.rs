//! Boundary call regression test
//!
//! Drives `detect` with raw BGRA bytes the way a foreign caller would, and
//! checks status codes and the no-partial-write guarantee.

use roiedge_core::{DetectionParameters, Rect};
use roiedge_filter::{detect, status_code};
use roiedge_test::{RegParams, synth};

const SENTINEL: u8 = 0xA5;

#[test]
fn boundary_harness_reg() {
    let mut rp = RegParams::new("boundary_harness");

    // 100x100 mid-gray image, centered 50x50 region, default parameters
    let img = synth::solid(100, 100, 128).unwrap();
    let input = img.to_packed_bytes();
    let roi = Rect::new(25, 25, 50, 50);
    let mut out = vec![SENTINEL; 50 * 50];
    let result = detect(&input, 100, 100, &mut out, &DetectionParameters::default(), roi);
    rp.compare_values(0.0, status_code(&result) as f64, 0.0);
    rp.check(result.ok() == Some((50, 50)), "reports 50x50");
    rp.check(out.iter().all(|&v| v == 0), "flat image has no edges");

    // A bright square inside the region: edges hug its border
    let square = Rect::new(40, 40, 20, 20);
    let img = synth::bright_square(100, 100, square, 30, 220).unwrap();
    let input = img.to_packed_bytes();
    let result = detect(&input, 100, 100, &mut out, &DetectionParameters::default(), roi);
    rp.compare_values(0.0, status_code(&result) as f64, 0.0);
    let mut count = 0;
    let mut near_border = true;
    for (i, &v) in out.iter().enumerate() {
        if v != 0 {
            count += 1;
            let x = roi.x + (i % 50) as i32;
            let y = roi.y + (i / 50) as i32;
            let outer = Rect::new(square.x - 3, square.y - 3, square.w + 6, square.h + 6);
            let inner = Rect::new(square.x + 3, square.y + 3, square.w - 6, square.h - 6);
            near_border &= outer.contains_point(x, y) && !inner.contains_point(x, y);
        }
    }
    rp.check(out.iter().all(|&v| v == 0 || v == 255), "two-valued");
    rp.check(count > 0, "square outline found");
    rp.check(near_border, "edges within three pixels of the square border");
    rp.write_pix(
        &roiedge_core::PixelBuffer::from_bytes(50, 50, roiedge_core::PixelFormat::Gray8, out)
            .unwrap(),
        "square",
    )
    .unwrap();

    assert!(rp.cleanup());
}

#[test]
fn boundary_status_reg() {
    let mut rp = RegParams::new("boundary_status");
    let input = synth::solid(100, 100, 128).unwrap().to_packed_bytes();
    let params = DetectionParameters::default();

    let cases: [(&[u8], Rect, DetectionParameters, usize, i32); 7] = [
        (&input, Rect::new(25, 25, 0, 50), params, 0, -2),
        (&input, Rect::new(25, 25, 50, -3), params, 0, -2),
        (&input, Rect::new(80, 80, 30, 30), params, 900, -3),
        (&input, Rect::new(-1, 0, 10, 10), params, 100, -3),
        (&input[..input.len() - 1], Rect::new(0, 0, 10, 10), params, 100, -4),
        (&input, Rect::new(0, 0, 10, 10), params, 99, -4),
        (
            &input,
            Rect::new(0, 0, 10, 10),
            DetectionParameters::new(f64::NAN, 150.0, 128),
            100,
            -5,
        ),
    ];
    for (data, roi, p, out_len, expected) in cases {
        let mut out = vec![SENTINEL; out_len];
        let result = detect(data, 100, 100, &mut out, &p, roi);
        rp.compare_values(expected as f64, status_code(&result) as f64, 0.0);
        rp.check(out.iter().all(|&v| v == SENTINEL), "output untouched");
    }

    assert!(rp.cleanup());
}
