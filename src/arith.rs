//! # Integer Arithmetic
//!
//! Greatest common divisors and least common multiples, for single pairs and
//! for whole lists. The pair versions are provided for every primitive integer
//! type through the [`Gcd`] trait so that callers can work with whichever width
//! their labels come in.
//!
//! The list versions follow the usual neutral-element conventions: the gcd of
//! an empty list is `0` and its lcm is `1`. [`Permutation::order`] relies on
//! the latter so that the empty permutation has order one. Least common
//! multiples outgrow their type quickly, the `checked_` variants report that
//! with `None`.
//!
//! [`Permutation::order`]: crate::permutation::Permutation::order

use duplicate::duplicate;

/// Euclid on integers.
pub trait Gcd: Sized + Copy {
    /// Non-negative greatest common divisor, `gcd(0, 0) == 0`.
    fn gcd(self, other: Self) -> Self;

    /// Non-negative least common multiple, `lcm(x, 0) == 0`.
    fn lcm(self, other: Self) -> Self;

    /// Same as [`Gcd::lcm`], `None` if the result does not fit in `Self`.
    fn checked_lcm(self, other: Self) -> Option<Self>;
}

duplicate! {
    [types;
        [i8]; [i16]; [i32]; [i64]; [i128]; [isize];
    ]

    impl Gcd for types {
        fn gcd(self, other: Self) -> Self {
            let (mut a, mut b) = (self.abs(), other.abs());
            while b != 0 {
                (a, b) = (b, a % b);
            }
            a
        }

        fn lcm(self, other: Self) -> Self {
            if self == 0 || other == 0 {
                return 0;
            }
            (self / self.gcd(other) * other).abs()
        }

        fn checked_lcm(self, other: Self) -> Option<Self> {
            if self == 0 || other == 0 {
                return Some(0);
            }
            (self / self.gcd(other)).checked_mul(other)?.checked_abs()
        }
    }
}

duplicate! {
    [types;
        [u8]; [u16]; [u32]; [u64]; [u128]; [usize];
    ]

    impl Gcd for types {
        fn gcd(self, other: Self) -> Self {
            let (mut a, mut b) = (self, other);
            while b != 0 {
                (a, b) = (b, a % b);
            }
            a
        }

        fn lcm(self, other: Self) -> Self {
            if self == 0 || other == 0 {
                return 0;
            }
            self / self.gcd(other) * other
        }

        fn checked_lcm(self, other: Self) -> Option<Self> {
            if self == 0 || other == 0 {
                return Some(0);
            }
            (self / self.gcd(other)).checked_mul(other)
        }
    }
}

pub fn gcd<T: Gcd>(a: T, b: T) -> T {
    a.gcd(b)
}

pub fn lcm<T: Gcd>(a: T, b: T) -> T {
    a.lcm(b)
}

/// Gcd of all entries, `0` for an empty list.
pub fn gcd_list<T, I>(values: I) -> T
where
    T: Gcd + From<u8>,
    I: IntoIterator<Item = T>,
{
    values.into_iter().fold(T::from(0), Gcd::gcd)
}

/// Lcm of all entries, `1` for an empty list.
pub fn lcm_list<T, I>(values: I) -> T
where
    T: Gcd + From<u8>,
    I: IntoIterator<Item = T>,
{
    values.into_iter().fold(T::from(1), Gcd::lcm)
}

/// Lcm of all entries, `1` for an empty list, `None` on overflow.
pub fn checked_lcm_list<T, I>(values: I) -> Option<T>
where
    T: Gcd + From<u8>,
    I: IntoIterator<Item = T>,
{
    values
        .into_iter()
        .try_fold(T::from(1), |acc, x| acc.checked_lcm(x))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gcd_pairs() {
        assert_eq!(gcd(1, 0), 1);
        assert_eq!(gcd(0, 1), 1);
        assert_eq!(gcd(2, 3), 1);
        assert_eq!(gcd(3, 2), 1);
        assert_eq!(gcd(10, 6), 2);
        assert_eq!(gcd(6, 10), 2);
        assert_eq!(gcd(-10i64, 6), 2);
        assert_eq!(gcd(0u32, 0), 0);
    }

    #[test]
    fn lcm_pairs() {
        assert_eq!(lcm(2, 3), 6);
        assert_eq!(lcm(3, 2), 6);
        assert_eq!(lcm(4, 6), 12);
        assert_eq!(lcm(6usize, 4), 12);
        assert_eq!(lcm(-4i32, 6), 12);
        assert_eq!(lcm(5u8, 0), 0);
    }

    #[test]
    fn lists() {
        assert_eq!(gcd_list(Vec::<i64>::new()), 0);
        assert_eq!(gcd_list([4, 6, 8, 10]), 2);
        assert_eq!(gcd_list([2, 2, 3]), 1);

        assert_eq!(lcm_list(Vec::<usize>::new()), 1);
        assert_eq!(lcm_list([2usize, 3, 4]), 12);
    }

    #[test]
    fn lcm_overflow() {
        assert_eq!(200u8.checked_lcm(3), None);
        assert_eq!(20u8.checked_lcm(30), Some(60));
        assert_eq!((-100i8).checked_lcm(3), None);
        assert_eq!(0u8.checked_lcm(200), Some(0));

        assert_eq!(checked_lcm_list(Vec::<u64>::new()), Some(1));
        assert_eq!(checked_lcm_list([2u64, 3, 4]), Some(12));

        let primes: [u64; 16] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53];
        assert_eq!(checked_lcm_list(primes[..15].iter().copied()), Some(614_889_782_588_491_410));
        assert_eq!(checked_lcm_list(primes), None);
    }
}
