//! C boundary regression test
//!
//! Calls `roiedge_detect` through raw pointers, the way the host
//! application does, with the original harness setup: a 100x100 gray
//! image and a centered 50x50 region.

use roiedge_ffi::roiedge_detect;
use roiedge_test::{RegParams, synth};
use std::ffi::c_int;

struct Call {
    width: c_int,
    height: c_int,
    level: c_int,
    roi: [c_int; 4],
    out_len: usize,
}

fn run(input: &[u8], call: &Call) -> (c_int, (c_int, c_int), Vec<u8>) {
    let mut output = vec![0xEEu8; call.out_len];
    let (mut w, mut h) = (-1, -1);
    let [x, y, rw, rh] = call.roi;
    let status = unsafe {
        roiedge_detect(
            input.as_ptr(),
            input.len(),
            call.width,
            call.height,
            output.as_mut_ptr(),
            output.len(),
            &mut w,
            &mut h,
            50.0,
            150.0,
            call.level,
            x,
            y,
            rw,
            rh,
        )
    };
    (status, (w, h), output)
}

#[test]
fn ffi_harness_reg() {
    let mut rp = RegParams::new("ffi_harness");
    let input = synth::solid(100, 100, 128).unwrap().to_packed_bytes();

    let ok = Call {
        width: 100,
        height: 100,
        level: 128,
        roi: [25, 25, 50, 50],
        out_len: 2500,
    };
    let (status, dims, out) = run(&input, &ok);
    rp.compare_values(0.0, status as f64, 0.0);
    rp.check(dims == (50, 50), "output dimensions reported");
    rp.check(out.iter().all(|&v| v == 0), "flat image, no edges");

    let square = synth::bright_square(100, 100, roiedge_core::Rect::new(40, 40, 20, 20), 0, 255)
        .unwrap()
        .to_packed_bytes();
    let (status, _, out) = run(&square, &ok);
    rp.compare_values(0.0, status as f64, 0.0);
    rp.check(out.iter().any(|&v| v == 255), "square edges found");

    assert!(rp.cleanup());
}

#[test]
fn ffi_status_reg() {
    let mut rp = RegParams::new("ffi_status");
    let input = synth::solid(100, 100, 128).unwrap().to_packed_bytes();
    let base = Call {
        width: 100,
        height: 100,
        level: 128,
        roi: [25, 25, 50, 50],
        out_len: 2500,
    };

    let cases = [
        (Call { roi: [25, 25, 0, 50], ..base }, -2),
        (Call { roi: [80, 80, 30, 30], out_len: 900, ..base }, -3),
        (Call { out_len: 2499, ..base }, -4),
        (Call { width: 99, ..base }, -4),
        (Call { width: -100, ..base }, -4),
        (Call { level: 256, ..base }, -5),
    ];
    for (call, expected) in &cases {
        let (status, dims, out) = run(&input, call);
        rp.compare_values(*expected as f64, status as f64, 0.0);
        rp.check(dims == (0, 0), "no dimensions on failure");
        rp.check(out.iter().all(|&v| v == 0xEE), "output untouched");
    }

    assert!(rp.cleanup());
}
