use blockscape_common::BLOCK_SIZE;

/// Generated stand-in for the block sprite sheet: every tile gets a flat
/// color derived from its grid position plus a darker one-pixel border.
pub fn placeholder_sheet(width: u32, height: u32) -> Vec<u8> {
    let tile = BLOCK_SIZE as u32;
    let mut rgba = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            let (column, row) = (x / tile, y / tile);
            let mut color = tile_color(column, row);
            let (px, py) = (x % tile, y % tile);
            if px == 0 || py == 0 || px == tile - 1 || py == tile - 1 {
                for c in &mut color[..3] {
                    *c /= 2;
                }
            }
            rgba.extend_from_slice(&color);
        }
    }
    rgba
}

fn tile_color(column: u32, row: u32) -> [u8; 4] {
    let h = (column.wrapping_mul(73_856_093) ^ row.wrapping_mul(19_349_663))
        .wrapping_mul(2_654_435_761);
    [
        64 + (h >> 24) as u8 % 192,
        64 + (h >> 16) as u8 % 192,
        64 + (h >> 8) as u8 % 192,
        255,
    ]
}
