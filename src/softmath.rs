//! Software Integer Arithmetic.
//!
//! This module implements multiply, divide, and modulo in pure software for
//! 32-bit and 64-bit operands, signed and unsigned. Targets without a hardware
//! divider route these operations here, so the routines avoid every operator
//! they exist to replace: multiplication is shift-and-add, division is
//! restoring binary long division.
//!
//! Division by zero is not a fault. The routines return fixed sentinel values
//! instead: all-ones for unsigned division, the signed maximum or minimum
//! (depending on the dividend's sign) for signed division, and the dividend
//! itself for modulo. Callers rely on these exact bit patterns.

/// Unsigned 32-bit multiply via shift-and-add over the multiplier's bits.
pub fn mul32(mut a: u32, mut b: u32) -> u32 {
    let mut res: u32 = 0;
    while b != 0 {
        if b & 1 != 0 {
            res = res.wrapping_add(a);
        }
        a <<= 1;
        b >>= 1;
    }
    res
}

/// Unsigned 64-bit multiply via shift-and-add over the multiplier's bits.
pub fn mul64(mut a: u64, mut b: u64) -> u64 {
    let mut res: u64 = 0;
    while b != 0 {
        if b & 1 != 0 {
            res = res.wrapping_add(a);
        }
        a <<= 1;
        b >>= 1;
    }
    res
}

/// Restoring long division, most significant bit first.
///
/// Returns `(quotient, remainder)`. The caller handles the zero divisor.
fn udivmod32(num: u32, den: u32) -> (u32, u32) {
    let mut q: u32 = 0;
    let mut r: u32 = 0;
    for i in (0..32).rev() {
        r <<= 1;
        r |= (num >> i) & 1;
        if r >= den {
            r -= den;
            q |= 1 << i;
        }
    }
    (q, r)
}

fn udivmod64(num: u64, den: u64) -> (u64, u64) {
    let mut q: u64 = 0;
    let mut r: u64 = 0;
    for i in (0..64).rev() {
        r <<= 1;
        r |= (num >> i) & 1;
        if r >= den {
            r -= den;
            q |= 1 << i;
        }
    }
    (q, r)
}

/// Unsigned 32-bit division. Division by zero yields all-ones.
pub fn udiv32(a: u32, b: u32) -> u32 {
    if b == 0 {
        return u32::MAX;
    }
    udivmod32(a, b).0
}

/// Unsigned 32-bit modulo. Modulo by zero yields the dividend.
pub fn umod32(a: u32, b: u32) -> u32 {
    if b == 0 {
        return a;
    }
    udivmod32(a, b).1
}

/// Unsigned 64-bit division. Division by zero yields all-ones.
pub fn udiv64(a: u64, b: u64) -> u64 {
    if b == 0 {
        return u64::MAX;
    }
    udivmod64(a, b).0
}

/// Unsigned 64-bit modulo. Modulo by zero yields the dividend.
pub fn umod64(a: u64, b: u64) -> u64 {
    if b == 0 {
        return a;
    }
    udivmod64(a, b).1
}

/// Signed 32-bit division with truncating (toward zero) semantics.
///
/// The quotient's sign is the XOR of the operand signs. Division by zero
/// yields `i32::MAX` for a non-negative dividend and `i32::MIN` otherwise.
pub fn div32(a: i32, b: i32) -> i32 {
    if b == 0 {
        return if a >= 0 { i32::MAX } else { i32::MIN };
    }
    let ua = a.unsigned_abs();
    let ub = b.unsigned_abs();
    let q = udivmod32(ua, ub).0;
    if (a ^ b) < 0 {
        (q as i32).wrapping_neg()
    } else {
        q as i32
    }
}

/// Signed 32-bit remainder. The remainder's sign matches the dividend's.
/// Modulo by zero yields the dividend.
pub fn rem32(a: i32, b: i32) -> i32 {
    if b == 0 {
        return a;
    }
    let ua = a.unsigned_abs();
    let ub = b.unsigned_abs();
    let r = udivmod32(ua, ub).1;
    if a < 0 {
        (r as i32).wrapping_neg()
    } else {
        r as i32
    }
}

/// Signed 64-bit division with truncating (toward zero) semantics.
pub fn div64(a: i64, b: i64) -> i64 {
    if b == 0 {
        return if a >= 0 { i64::MAX } else { i64::MIN };
    }
    let ua = a.unsigned_abs();
    let ub = b.unsigned_abs();
    let q = udivmod64(ua, ub).0;
    if (a ^ b) < 0 {
        (q as i64).wrapping_neg()
    } else {
        q as i64
    }
}

/// Signed 64-bit remainder. The remainder's sign matches the dividend's.
pub fn rem64(a: i64, b: i64) -> i64 {
    if b == 0 {
        return a;
    }
    let ua = a.unsigned_abs();
    let ub = b.unsigned_abs();
    let r = udivmod64(ua, ub).1;
    if a < 0 {
        (r as i64).wrapping_neg()
    } else {
        r as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mul_matches_hardware() {
        assert_eq!(mul32(7, 6), 42);
        assert_eq!(mul32(0xFFFF_FFFF, 2), 0xFFFF_FFFE);
        assert_eq!(mul64(0x1_0000_0001, 3), 0x3_0000_0003);
        assert_eq!(mul64(u64::MAX, u64::MAX), 1);
    }

    #[test]
    fn udiv_basic() {
        assert_eq!(udiv32(100, 7), 14);
        assert_eq!(umod32(100, 7), 2);
        assert_eq!(udiv64(1 << 40, 3), (1u64 << 40) / 3);
        assert_eq!(umod64(1 << 40, 3), (1u64 << 40) % 3);
    }

    #[test]
    fn div_by_zero_sentinels() {
        assert_eq!(udiv32(123, 0), u32::MAX);
        assert_eq!(umod32(123, 0), 123);
        assert_eq!(udiv64(123, 0), u64::MAX);
        assert_eq!(umod64(123, 0), 123);
        assert_eq!(div32(5, 0), i32::MAX);
        assert_eq!(div32(-5, 0), i32::MIN);
        assert_eq!(rem32(-5, 0), -5);
        assert_eq!(div64(5, 0), i64::MAX);
        assert_eq!(div64(-5, 0), i64::MIN);
        assert_eq!(rem64(-5, 0), -5);
    }

    #[test]
    fn signed_sign_rules() {
        assert_eq!(div32(-100, 7), -14);
        assert_eq!(rem32(-100, 7), -2);
        assert_eq!(div32(100, -7), -14);
        assert_eq!(rem32(100, -7), 2);
        assert_eq!(div64(-100, -7), 14);
        assert_eq!(rem64(-100, -7), -2);
    }

    #[test]
    fn division_round_trip() {
        // a == (a/b)*b + a%b for b != 0, in every width and signedness.
        let u32_ops = [0u32, 1, 2, 41, 42, 1000, u32::MAX];
        for &a in &u32_ops {
            for &b in &u32_ops[1..] {
                assert_eq!(a, udiv32(a, b).wrapping_mul(b).wrapping_add(umod32(a, b)));
            }
        }
        let i32_ops = [0i32, 1, -1, 42, -42, i32::MAX, i32::MIN];
        for &a in &i32_ops {
            for &b in &i32_ops {
                if b == 0 {
                    continue;
                }
                assert_eq!(a, div32(a, b).wrapping_mul(b).wrapping_add(rem32(a, b)));
            }
        }
        let u64_ops = [0u64, 1, 42, 1 << 40, u64::MAX];
        for &a in &u64_ops {
            for &b in &u64_ops[1..] {
                assert_eq!(a, udiv64(a, b).wrapping_mul(b).wrapping_add(umod64(a, b)));
            }
        }
        let i64_ops = [0i64, 1, -1, 42, -42, i64::MAX, i64::MIN];
        for &a in &i64_ops {
            for &b in &i64_ops {
                if b == 0 {
                    continue;
                }
                assert_eq!(a, div64(a, b).wrapping_mul(b).wrapping_add(rem64(a, b)));
            }
        }
    }

    #[test]
    fn min_signed_operands() {
        // i32::MIN has no positive counterpart; unsigned_abs keeps the bits.
        assert_eq!(div32(i32::MIN, 1), i32::MIN);
        assert_eq!(rem32(i32::MIN, 1), 0);
        assert_eq!(div32(i32::MIN, -1), i32::MIN);
        assert_eq!(div64(i64::MIN, 2), i64::MIN / 2);
    }
}
