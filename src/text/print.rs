//! Number and string formatting on top of a single-byte sink.

/// Radix for `print_number` and `print_signed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Base {
    Bin = 2,
    Oct = 8,
    Dec = 10,
    Hex = 16,
}

/// Anything that accepts bytes one at a time.
///
/// Implementors provide `write_byte`; everything else is built on it. Every
/// method returns the number of bytes accepted.
pub trait Print {
    fn write_byte(&mut self, byte: u8) -> usize;

    fn write_bytes(&mut self, bytes: &[u8]) -> usize {
        bytes.iter().map(|&b| self.write_byte(b)).sum()
    }

    fn print(&mut self, s: &str) -> usize {
        self.write_bytes(s.as_bytes())
    }

    fn println(&mut self, s: &str) -> usize {
        self.print(s) + self.write_bytes(b"\r\n")
    }

    /// Unsigned value in `base`, upper-case hex digits, no prefix.
    fn print_number(&mut self, mut n: u32, base: Base) -> usize {
        let radix = base as u32;
        let mut buf = [0u8; 32];
        let mut i = buf.len();
        loop {
            let digit = (n % radix) as u8;
            i -= 1;
            buf[i] = if digit < 10 { b'0' + digit } else { b'A' + digit - 10 };
            n /= radix;
            if n == 0 {
                break;
            }
        }
        self.write_bytes(&buf[i..])
    }

    /// Decimal values get a sign; other bases print the two's complement bits.
    fn print_signed(&mut self, n: i32, base: Base) -> usize {
        match base {
            Base::Dec if n < 0 => self.write_byte(b'-') + self.print_number(n.unsigned_abs(), base),
            _ => self.print_number(n as u32, base),
        }
    }

    /// Fixed-point decimal with `digits` fractional digits, rounded half up.
    /// Prints `nan`, `inf` or `ovf` for values it cannot show.
    fn print_float(&mut self, value: f64, digits: u8) -> usize {
        if value.is_nan() {
            return self.print("nan");
        }
        if value.is_infinite() {
            return self.print("inf");
        }
        if !(-4_294_967_040.0..=4_294_967_040.0).contains(&value) {
            return self.print("ovf");
        }

        let mut count = 0;
        let mut value = value;
        if value < 0.0 {
            count += self.write_byte(b'-');
            value = -value;
        }

        value += 0.5 / libm::pow(10.0, digits as f64);
        let whole = value as u32;
        let mut rest = value - whole as f64;
        count += self.print_number(whole, Base::Dec);

        if digits > 0 {
            count += self.write_byte(b'.');
        }
        for _ in 0..digits {
            rest *= 10.0;
            let digit = (rest as u32).min(9);
            count += self.print_number(digit, Base::Dec);
            rest -= digit as f64;
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::{string::String, vec::Vec};

    #[derive(Default)]
    struct Sink(Vec<u8>);

    impl Print for Sink {
        fn write_byte(&mut self, byte: u8) -> usize {
            self.0.push(byte);
            1
        }
    }

    fn out(f: impl FnOnce(&mut Sink) -> usize) -> (String, usize) {
        let mut sink = Sink::default();
        let n = f(&mut sink);
        (String::from_utf8(sink.0).unwrap(), n)
    }

    #[test]
    fn numbers_in_every_base() {
        assert_eq!(out(|s| s.print_number(0, Base::Dec)).0, "0");
        assert_eq!(out(|s| s.print_number(255, Base::Hex)).0, "FF");
        assert_eq!(out(|s| s.print_number(8, Base::Oct)).0, "10");
        assert_eq!(out(|s| s.print_number(5, Base::Bin)), ("101".into(), 3));
        assert_eq!(out(|s| s.print_number(u32::MAX, Base::Bin)).0.len(), 32);
    }

    #[test]
    fn signed_values() {
        assert_eq!(out(|s| s.print_signed(-42, Base::Dec)), ("-42".into(), 3));
        assert_eq!(out(|s| s.print_signed(i32::MIN, Base::Dec)).0, "-2147483648");
        assert_eq!(out(|s| s.print_signed(-1, Base::Hex)).0, "FFFFFFFF");
    }

    #[test]
    fn floats() {
        assert_eq!(out(|s| s.print_float(3.14159, 2)).0, "3.14");
        assert_eq!(out(|s| s.print_float(-0.5, 1)).0, "-0.5");
        assert_eq!(out(|s| s.print_float(1.999, 2)).0, "2.00");
        assert_eq!(out(|s| s.print_float(7.0, 0)).0, "7");
        assert_eq!(out(|s| s.print_float(f64::NAN, 2)).0, "nan");
        assert_eq!(out(|s| s.print_float(f64::INFINITY, 2)).0, "inf");
        assert_eq!(out(|s| s.print_float(1e12, 2)).0, "ovf");
    }

    #[test]
    fn println_ends_with_crlf() {
        assert_eq!(out(|s| s.println("hi")), ("hi\r\n".into(), 4));
    }
}
