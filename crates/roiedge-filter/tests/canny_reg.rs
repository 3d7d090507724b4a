//! Edge detector regression test
//!
//! Synthetic steps with hand-computed gradients, plus the structural
//! properties of the detector: output size, purity, threshold
//! monotonicity and ROI locality.

use roiedge_core::{DetectionParameters, ErrorKind, PixelBuffer, PixelFormat, Rect};
use roiedge_filter::canny_roi;
use roiedge_test::{RegParams, synth};

fn edge_columns(map: &PixelBuffer, y: u32) -> Vec<u32> {
    let row = map.row(y);
    (0..map.width()).filter(|&x| row[x as usize] != 0).collect()
}

#[test]
fn canny_step_reg() {
    let mut rp = RegParams::new("canny_step");
    let params = DetectionParameters::default();

    // 0 | 255 at column 25: smoothed gradient peaks at columns 24 and 25
    // with 637.5 each; the plateau rule keeps column 24
    let step = synth::vertical_step(50, 50, 25, 0, 255).unwrap();
    let map = canny_roi(&step, &step.bounds(), &params).unwrap();
    rp.compare_values(50.0, map.width() as f64, 0.0);
    rp.compare_values(50.0, map.height() as f64, 0.0);
    rp.compare_values(50.0, map.count_nonzero().unwrap() as f64, 0.0);
    for y in [0, 1, 25, 48, 49] {
        rp.check(edge_columns(&map, y) == vec![24], "single column at 24");
    }
    rp.check(
        map.data().iter().all(|&v| v == 0 || v == 255),
        "two-valued",
    );
    rp.write_pix(&map, "step").unwrap();

    // 0 | 40: peak magnitude 100 is only weak for 50 / 150
    let faint = synth::vertical_step(50, 50, 25, 0, 40).unwrap();
    let map = canny_roi(&faint, &faint.bounds(), &params).unwrap();
    rp.compare_values(0.0, map.count_nonzero().unwrap() as f64, 0.0);

    // Same step made strong, but its intensity 100 sits below level 128
    let strong = DetectionParameters::new(50.0, 90.0, 128);
    let map = canny_roi(&faint, &faint.bounds(), &strong).unwrap();
    rp.compare_values(0.0, map.count_nonzero().unwrap() as f64, 0.0);

    let low_level = DetectionParameters::new(50.0, 90.0, 100);
    let map = canny_roi(&faint, &faint.bounds(), &low_level).unwrap();
    rp.compare_values(50.0, map.count_nonzero().unwrap() as f64, 0.0);
    rp.check(edge_columns(&map, 10) == vec![24], "faint edge at 24");

    // Level 0 turns every pixel on
    let all_on = DetectionParameters::new(50.0, 150.0, 0);
    let map = canny_roi(&faint, &Rect::new(5, 5, 10, 7), &all_on).unwrap();
    rp.compare_values(70.0, map.count_nonzero().unwrap() as f64, 0.0);

    assert!(rp.cleanup());
}

#[test]
fn canny_properties_reg() {
    let mut rp = RegParams::new("canny_properties");
    let params = DetectionParameters::default();
    let img = synth::noisy(
        &synth::bright_square(80, 60, Rect::new(20, 15, 30, 25), 40, 210).unwrap(),
        30,
        7,
    )
    .unwrap();

    // Output size equals the ROI size
    for roi in [
        Rect::new(0, 0, 80, 60),
        Rect::new(10, 5, 33, 17),
        Rect::new(79, 59, 1, 1),
        Rect::new(0, 30, 80, 2),
    ] {
        let map = canny_roi(&img, &roi, &params).unwrap();
        rp.check(
            map.dimensions() == (roi.w as u32, roi.h as u32),
            "dimensions equal roi",
        );
        rp.check(map.format() == PixelFormat::Gray8, "gray output");
    }

    // Idempotent and independent of earlier calls
    let roi = Rect::new(10, 5, 50, 45);
    let first = canny_roi(&img, &roi, &params).unwrap();
    let other = synth::checkerboard(80, 60, 4, 0, 255).unwrap();
    canny_roi(&other, &roi, &DetectionParameters::new(1.0, 2.0, 3)).unwrap();
    let second = canny_roi(&img, &roi, &params).unwrap();
    rp.compare_pix(&first, &second);
    rp.check(first.count_nonzero().unwrap() > 0, "square outline found");

    // Reversed thresholds behave like ordered ones
    let swapped = DetectionParameters::new(150.0, 50.0, 128);
    rp.compare_pix(&first, &canny_roi(&img, &roi, &swapped).unwrap());

    // Pixels outside the ROI do not matter
    let mut altered = img.to_mut();
    for y in 0..altered.height() {
        let row = altered.row_mut(y);
        for (x, px) in row.chunks_exact_mut(4).enumerate() {
            if !roi.contains_point(x as i32, y as i32) {
                px.copy_from_slice(&[255, 0, 255, 255]);
            }
        }
    }
    let altered: PixelBuffer = altered.into();
    rp.compare_pix(&first, &canny_roi(&altered, &roi, &params).unwrap());

    // Gray input gives the same map as BGRA input of equal luma
    let gray = img.convert_to_luminance().unwrap();
    rp.compare_pix(&first, &canny_roi(&gray, &roi, &params).unwrap());

    assert!(rp.cleanup());
}

#[test]
fn canny_monotonic_reg() {
    let mut rp = RegParams::new("canny_monotonic");
    let img = synth::noise(64, 64, 42).unwrap();

    // Level 1 keeps every promoted pixel, so counts track the promoted set
    let mut previous = u64::MAX;
    for high in [20.0, 60.0, 120.0, 250.0, 500.0, 1000.0, 1500.0] {
        let params = DetectionParameters::new(20.0, high, 1);
        let map = canny_roi(&img, &img.bounds(), &params).unwrap();
        let count = map.count_nonzero().unwrap();
        rp.check(count <= previous, "non-increasing in high threshold");
        previous = count;
    }
    rp.compare_values(0.0, previous as f64, 0.0);

    assert!(rp.cleanup());
}

#[test]
fn canny_stride_reg() {
    let mut rp = RegParams::new("canny_stride");
    let params = DetectionParameters::default();
    let packed = synth::noisy(
        &synth::bright_square(20, 15, Rect::new(6, 4, 8, 6), 10, 240).unwrap(),
        20,
        7,
    )
    .unwrap();

    // Same pixels, each row followed by 12 bytes of junk
    let pad = 12;
    let stride = 20 * 4 + pad;
    let mut data = Vec::with_capacity(stride * 15);
    for y in 0..15 {
        data.extend_from_slice(packed.row(y));
        data.extend(std::iter::repeat_n(0xEE, pad));
    }
    let padded =
        PixelBuffer::from_bytes_with_stride(20, 15, PixelFormat::Bgra8, stride, data).unwrap();
    rp.check(padded == packed, "same pixels");

    let roi = Rect::new(3, 2, 14, 11);
    let a = canny_roi(&packed, &roi, &params).unwrap();
    let b = canny_roi(&padded, &roi, &params).unwrap();
    rp.check(a.count_nonzero().unwrap() > 0, "square outline found");
    rp.compare_strings(&a.to_packed_bytes(), &b.to_packed_bytes());

    assert!(rp.cleanup());
}

#[test]
fn canny_errors_reg() {
    let mut rp = RegParams::new("canny_errors");
    let img = synth::solid(100, 100, 128).unwrap();
    let params = DetectionParameters::default();

    let cases = [
        (Rect::new(10, 10, 0, 5), ErrorKind::RoiEmpty),
        (Rect::new(10, 10, 5, -1), ErrorKind::RoiEmpty),
        (Rect::new(80, 80, 30, 30), ErrorKind::RoiOutOfBounds),
        (Rect::new(-1, 0, 10, 10), ErrorKind::RoiOutOfBounds),
    ];
    for (roi, kind) in cases {
        let err = canny_roi(&img, &roi, &params).unwrap_err();
        rp.check(err.kind() == kind, &format!("{roi} -> {kind}"));
    }

    let bad = DetectionParameters::new(50.0, 150.0, 256);
    let err = canny_roi(&img, &Rect::new(0, 0, 10, 10), &bad).unwrap_err();
    rp.check(err.kind() == ErrorKind::InvalidParameters, "level 256");

    assert!(rp.cleanup());
}
