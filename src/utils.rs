/// Formats a float with the given amount of significant digits.
///
/// Mirrors the `%g` printf conversion: fixed notation is used while the
/// decimal exponent lies in `[-4, digits)`, scientific notation otherwise,
/// and trailing zeros are dropped in both cases.
pub fn format_significant(value: f64, digits: usize) -> String {
	if !value.is_finite() {
		return value.to_string();
	} else if value == 0.0 {
		return "0".to_owned();
	}

	let digits = digits.max(1);
	let scientific = format!("{:.*e}", digits - 1, value);
	let (mantissa, exponent) = scientific.split_once('e').unwrap_or((&scientific, "0"));
	let exponent: i32 = exponent.parse().unwrap_or(0);

	if exponent < -4 || exponent >= digits as i32 {
		let sign = if exponent < 0 { '-' } else { '+' };
		format!(
			"{}e{}{:02}",
			strip_trailing_zeros(mantissa),
			sign,
			exponent.abs()
		)
	} else {
		let decimals = (digits as i32 - 1 - exponent).max(0) as usize;
		strip_trailing_zeros(&format!("{:.*}", decimals, value)).to_owned()
	}
}

#[inline]
fn strip_trailing_zeros(number: &str) -> &str {
	if number.contains('.') {
		number.trim_end_matches('0').trim_end_matches('.')
	} else {
		number
	}
}

/// Wraps some text inside a discord code block.
#[inline]
pub fn code_block(text: &str) -> String {
	format!("```{text}```")
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn fixed_notation() {
		assert_eq!(format_significant(66.666666, 4), "66.67");
		assert_eq!(format_significant(100.0, 4), "100");
		assert_eq!(format_significant(0.5, 4), "0.5");
		assert_eq!(format_significant(0.000123456, 4), "0.0001235");
		assert_eq!(format_significant(1234.4, 4), "1234");
	}

	#[test]
	fn scientific_notation() {
		assert_eq!(format_significant(0.00001234, 4), "1.234e-05");
		assert_eq!(format_significant(123456.0, 4), "1.235e+05");
		// Rounding can bump the exponent past the precision
		assert_eq!(format_significant(9999.9, 4), "1e+04");
	}

	#[test]
	fn zero_and_negatives() {
		assert_eq!(format_significant(0.0, 4), "0");
		assert_eq!(format_significant(-2.5, 4), "-2.5");
	}
}
