//! Human-readable byte size formatting for error messages.

const KIB: u64 = 1024;
const MIB: u64 = 1024 * 1024;
const GIB: u64 = 1024 * 1024 * 1024;

/// Format a byte count for display.
///
/// Sizes of a kibibyte and up render with two decimals (`1.00 KB`,
/// `1.00 MB`, `1.00 GB`); smaller sizes render as plain byte counts with
/// correct pluralization.
pub fn human_size(bytes: u64) -> String {
    match bytes {
        0 => "0 bytes".to_string(),
        1 => "1 byte".to_string(),
        b if b >= GIB => format!("{:.2} GB", b as f64 / GIB as f64),
        b if b >= MIB => format!("{:.2} MB", b as f64 / MIB as f64),
        b if b >= KIB => format!("{:.2} KB", b as f64 / KIB as f64),
        b => format!("{} bytes", b),
    }
}
