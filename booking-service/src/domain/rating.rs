use rust_decimal::Decimal;

use super::round_money;

/// Mean rating rounded to two places, and the number of reviews.
pub fn recompute(ratings: &[i16]) -> (Decimal, i32) {
    if ratings.is_empty() {
        return (Decimal::ZERO, 0);
    }

    let sum: i64 = ratings.iter().map(|r| i64::from(*r)).sum();
    let count = ratings.len() as i64;
    let mean = Decimal::from(sum) / Decimal::from(count);

    (round_money(mean), count as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_ratings() {
        assert_eq!(recompute(&[5, 4]), (Decimal::new(450, 2), 2));
        assert_eq!(recompute(&[5, 4, 4]), (Decimal::new(433, 2), 3));
        assert_eq!(recompute(&[5, 5, 4]), (Decimal::new(467, 2), 3));
    }

    #[test]
    fn no_reviews_is_zero() {
        assert_eq!(recompute(&[]), (Decimal::ZERO, 0));
    }
}
