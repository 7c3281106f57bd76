/// Canonical string form of a computed number.
///
/// The result parses back to the same `f64`, so a dependent cell reading the
/// stored value sees exactly what was computed.
pub fn format_number(n: f64) -> String {
    if n == 0.0 {
        // Collapses -0.
        "0".to_string()
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::format_number;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(11.0), "11");
        assert_eq!(format_number(-3.0), "-3");
        assert_eq!(format_number(3.5), "3.5");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(f64::INFINITY), "inf");
    }

    #[test]
    fn test_format_number_round_trips() {
        for n in [0.1, 1.0 / 3.0, 1e21, 123456.789, -2.5e-8] {
            assert_eq!(format_number(n).parse::<f64>().unwrap(), n);
        }
    }
}
