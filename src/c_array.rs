//! Renders a container as C source for linking into a cartridge image.

use std::fmt::Write;

const BYTES_PER_LINE: usize = 16;

/// Emits `const unsigned char <name>[]` holding `bytes` (16 per line) and a
/// matching `<name>_size` constant.
pub fn render(bytes: &[u8], array_name: &str, source_name: &str) -> String {
    let mut out = String::with_capacity(bytes.len() * 6 + 128);
    // Writing to a String cannot fail.
    let _ = writeln!(out, "// Auto-generated from {source_name}");
    let _ = writeln!(out, "// File size: {} bytes\n", bytes.len());
    let _ = writeln!(out, "const unsigned char {array_name}[] = {{");

    for (i, line) in bytes.chunks(BYTES_PER_LINE).enumerate() {
        let last_line = (i + 1) * BYTES_PER_LINE >= bytes.len();
        let hex: Vec<String> = line.iter().map(|b| format!("0x{b:02x}")).collect();
        let _ = write!(out, "    {}", hex.join(", "));
        out.push_str(if last_line { "\n" } else { ",\n" });
    }

    out.push_str("};\n\n");
    let _ = writeln!(out, "const unsigned int {array_name}_size = {};", bytes.len());
    out
}

/// Turns a file stem into a valid C identifier.
pub fn identifier(stem: &str) -> String {
    let mut id: String = stem
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();
    if id.is_empty() || id.starts_with(|c: char| c.is_ascii_digit()) {
        id.insert(0, '_');
    }
    id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_lines_of_sixteen() {
        let bytes: Vec<u8> = (0u8..18).collect();
        let c = render(&bytes, "track_01", "track_01.pgda");
        let expected = "\
// Auto-generated from track_01.pgda
// File size: 18 bytes

const unsigned char track_01[] = {
    0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e, 0x0f,
    0x10, 0x11
};

const unsigned int track_01_size = 18;
";
        assert_eq!(c, expected);
    }

    #[test]
    fn exact_multiple_has_no_trailing_comma() {
        let c = render(&[0xAB; 16], "a", "a.bin");
        assert!(c.contains("0xab, 0xab\n};"));
    }

    #[test]
    fn identifiers_are_sanitized() {
        assert_eq!(identifier("1 Crumbling Castle"), "_1_crumbling_castle");
        assert_eq!(identifier("intro-loop"), "intro_loop");
        assert_eq!(identifier(""), "_");
    }
}
