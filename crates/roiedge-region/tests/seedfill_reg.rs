//! Seed fill regression test
//!
//! Reconstructs rings and lines from single seeds and checks that only
//! the seeded components survive.

use roiedge_core::{PixelBuffer, PixelFormat, Rect};
use roiedge_region::{ConnectivityType, count_components, seedfill_binary};
use roiedge_test::RegParams;

/// Gray8 mask with the outline of each rectangle set
fn outlines(width: u32, height: u32, rects: &[Rect]) -> PixelBuffer {
    let mut pix = PixelBuffer::new(width, height, PixelFormat::Gray8)
        .unwrap()
        .to_mut();
    for r in rects {
        for x in r.x..r.x + r.w {
            pix.set_pixel(x as u32, r.y as u32, 1).unwrap();
            pix.set_pixel(x as u32, (r.y + r.h - 1) as u32, 1).unwrap();
        }
        for y in r.y..r.y + r.h {
            pix.set_pixel(r.x as u32, y as u32, 1).unwrap();
            pix.set_pixel((r.x + r.w - 1) as u32, y as u32, 1).unwrap();
        }
    }
    pix.into()
}

#[test]
fn seedfill_reg() {
    let mut rp = RegParams::new("seedfill");

    let rings = [Rect::new(2, 2, 10, 8), Rect::new(20, 4, 6, 6)];
    let mask = outlines(32, 16, &rings);
    rp.compare_values(
        2.0,
        count_components(&mask, ConnectivityType::EightWay).unwrap() as f64,
        0.0,
    );

    // Seed one pixel of the first ring
    let mut seed = PixelBuffer::new(32, 16, PixelFormat::Gray8).unwrap().to_mut();
    seed.set_pixel(11, 5, 1).unwrap();
    let seed: PixelBuffer = seed.into();

    let filled = seedfill_binary(&seed, &mask, ConnectivityType::EightWay).unwrap();
    // Perimeter of a 10x8 outline
    rp.compare_values(32.0, filled.count_nonzero().unwrap() as f64, 0.0);
    rp.check(filled.get_pixel(20, 4) == Some(0), "second ring not reached");
    rp.check(filled.get_pixel(2, 2) == Some(255), "far corner reached");

    // Reconstruction is idempotent
    let again = seedfill_binary(&filled, &mask, ConnectivityType::EightWay).unwrap();
    rp.compare_pix(&filled, &again);
    rp.write_pix(&filled, "filled").unwrap();

    assert!(rp.cleanup());
}
