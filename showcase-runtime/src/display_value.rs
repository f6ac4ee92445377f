//! # DisplayValue 模块
//!
//! 解析带格式的展示数值（如 `"$12.9B"`、`"2,500+"`），并按原格式重新渲染任意中间值。
//!
//! ## 数值字面量规则
//!
//! ```text
//! "$12.9B"    -> prefix "$",  literal "12.9",     suffix "B"
//! "2,500+"    -> prefix "",   literal "2,500",    suffix "+"
//! "-3.1%"     -> prefix "-",  literal "3.1",      suffix "%"
//! "1,00,000"  -> prefix "",   literal "1,00,000", suffix ""   (目标 100000，按 3 位重新分组)
//! "$.75M"     -> prefix "$",  literal ".75",      suffix "M"
//! ```
//!
//! - 字面量从第一个 ASCII 数字（或紧跟数字的 `.`）开始
//! - 字面量内的千位分隔符 `,` 一律去掉后再取数字，分隔符只在其后继续数字时才属于字面量
//! - 小数点最多一个，且后面必须紧跟数字
//! - 字面量之外的字符原样保留为前缀/后缀
//!
//! 最终帧由保存下来的数字串直接渲染，不经过浮点数，因此任意位数都能精确还原。

use serde::{Deserialize, Serialize};

/// 千位分隔符
pub const GROUP_SEPARATOR: char = ',';

/// 已解析的展示数值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayValue {
    /// 数值前的原始字符
    prefix: String,
    /// 数值后的原始字符
    suffix: String,
    /// 整数部分数字（去掉分隔符与前导零，至少为 "0"）
    int_digits: String,
    /// 小数部分数字
    frac_digits: String,
    /// 目标数值（用于中间帧插值）
    target: f64,
    /// 原字面量是否带千位分隔符
    grouped: bool,
}

impl DisplayValue {
    /// 解析展示字符串
    ///
    /// 找不到数值字面量（或数值不是有限数）时返回 `None`，调用方应原样显示输入。
    pub fn parse(raw: &str) -> Option<Self> {
        let bytes = raw.as_bytes();
        let start = (0..bytes.len())
            .find(|&i| bytes[i].is_ascii_digit() || (bytes[i] == b'.' && digit_at(bytes, i + 1)))?;

        let mut int_digits = String::new();
        let mut frac_digits = String::new();
        let mut in_fraction = false;
        let mut grouped = false;
        let mut end = start;

        while end < bytes.len() {
            let b = bytes[end];
            if b.is_ascii_digit() {
                if in_fraction {
                    frac_digits.push(b as char);
                } else {
                    int_digits.push(b as char);
                }
                end += 1;
            } else if b == b'.' && !in_fraction && digit_at(bytes, end + 1) {
                in_fraction = true;
                end += 1;
            } else if b == GROUP_SEPARATOR as u8 {
                let next = skip_separators(bytes, end);
                let continues = digit_at(bytes, next)
                    || (!in_fraction && bytes.get(next) == Some(&b'.') && digit_at(bytes, next + 1));
                if !continues {
                    break;
                }
                grouped = true;
                end = next;
            } else {
                break;
            }
        }

        let int_digits = match int_digits.trim_start_matches('0') {
            "" => "0".to_string(),
            trimmed => trimmed.to_string(),
        };
        let target: f64 = if frac_digits.is_empty() {
            int_digits.parse().ok()?
        } else {
            format!("{int_digits}.{frac_digits}").parse().ok()?
        };
        if !target.is_finite() {
            return None;
        }

        Some(Self {
            prefix: raw[..start].to_string(),
            suffix: raw[end..].to_string(),
            int_digits,
            frac_digits,
            target,
            grouped,
        })
    }

    /// 按原格式渲染数值
    ///
    /// - 小数：固定保留与原字面量相同的位数
    /// - 整数：向下取整
    /// - 原字面量带分隔符时，整数部分重新分组
    pub fn format(&self, value: f64) -> String {
        let value = value.max(0.0);
        let number = if self.decimals() > 0 {
            format!("{:.*}", self.decimals(), value)
        } else {
            format!("{:.0}", value.floor())
        };
        self.wrap(&number)
    }

    /// 渲染目标值（动画最后一帧），直接使用解析出的数字串
    pub fn format_target(&self) -> String {
        if self.frac_digits.is_empty() {
            self.wrap(&self.int_digits)
        } else {
            self.wrap(&format!("{}.{}", self.int_digits, self.frac_digits))
        }
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    /// 小数位数（整数为 0）
    pub fn decimals(&self) -> usize {
        self.frac_digits.len()
    }

    pub fn is_grouped(&self) -> bool {
        self.grouped
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    fn wrap(&self, number: &str) -> String {
        let number = if self.grouped {
            group_thousands(number)
        } else {
            number.to_string()
        };
        format!("{}{}{}", self.prefix, number, self.suffix)
    }
}

fn digit_at(bytes: &[u8], at: usize) -> bool {
    bytes.get(at).is_some_and(u8::is_ascii_digit)
}

/// 跳过连续的分隔符，返回其后第一个字符的位置
fn skip_separators(bytes: &[u8], at: usize) -> usize {
    at + bytes[at..]
        .iter()
        .take_while(|&&b| b == GROUP_SEPARATOR as u8)
        .count()
}

/// 为整数部分插入千位分隔符，小数部分不变
fn group_thousands(number: &str) -> String {
    let (int_part, frac_part) = match number.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (number, None),
    };

    let len = int_part.len();
    let mut out = String::with_capacity(len + len / 3 + number.len());
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(GROUP_SEPARATOR);
        }
        out.push(c);
    }
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_prefix_suffix() {
        let v = DisplayValue::parse("$12.9B").unwrap();
        assert_eq!(v.prefix(), "$");
        assert_eq!(v.suffix(), "B");
        assert_eq!(v.target(), 12.9);
        assert_eq!(v.decimals(), 1);
        assert!(!v.is_grouped());
    }

    #[test]
    fn test_parse_grouped() {
        let v = DisplayValue::parse("2,500+").unwrap();
        assert_eq!(v.prefix(), "");
        assert_eq!(v.suffix(), "+");
        assert_eq!(v.target(), 2500.0);
        assert!(v.is_grouped());
        insta::assert_snapshot!(v.format(1200.7), @"1,200+");
    }

    #[test]
    fn test_parse_sign_goes_to_prefix() {
        let v = DisplayValue::parse("-3.1%").unwrap();
        assert_eq!(v.prefix(), "-");
        assert_eq!(v.target(), 3.1);
        assert_eq!(v.format_target(), "-3.1%");
    }

    #[test]
    fn test_parse_no_number() {
        assert!(DisplayValue::parse("Global").is_none());
        assert!(DisplayValue::parse("").is_none());
        assert!(DisplayValue::parse("...").is_none());
    }

    #[test]
    fn test_separators_stripped_before_matching() {
        // 印度式分组
        let v = DisplayValue::parse("1,00,000").unwrap();
        assert_eq!(v.target(), 100_000.0);
        assert_eq!(v.suffix(), "");
        assert!(v.is_grouped());
        assert_eq!(v.format_target(), "100,000");

        let v = DisplayValue::parse("1,2345").unwrap();
        assert_eq!(v.target(), 12_345.0);
        assert_eq!(v.format_target(), "12,345");

        let v = DisplayValue::parse("12,34+").unwrap();
        assert_eq!(v.target(), 1234.0);
        assert_eq!(v.suffix(), "+");
        assert_eq!(v.format(600.0), "600+");
        assert_eq!(v.format_target(), "1,234+");

        let v = DisplayValue::parse("1234,567").unwrap();
        assert_eq!(v.target(), 1_234_567.0);
        assert_eq!(v.format_target(), "1,234,567");
    }

    #[test]
    fn test_separator_not_followed_by_digit_ends_literal() {
        let v = DisplayValue::parse("Top 10, then 20").unwrap();
        assert_eq!(v.target(), 10.0);
        assert!(!v.is_grouped());
        assert_eq!(v.suffix(), ", then 20");
        assert_eq!(v.format_target(), "Top 10, then 20");
    }

    #[test]
    fn test_leading_decimal_point() {
        let v = DisplayValue::parse(".5").unwrap();
        assert_eq!(v.prefix(), "");
        assert_eq!(v.target(), 0.5);
        assert_eq!(v.decimals(), 1);
        assert_eq!(v.format(0.3), "0.3");
        assert_eq!(v.format_target(), "0.5");

        let v = DisplayValue::parse("$.75M").unwrap();
        assert_eq!(v.prefix(), "$");
        assert_eq!(v.suffix(), "M");
        assert_eq!(v.target(), 0.75);
        assert_eq!(v.decimals(), 2);
        assert_eq!(v.format_target(), "$0.75M");
    }

    #[test]
    fn test_trailing_dot_not_decimal() {
        let v = DisplayValue::parse("5. Years").unwrap();
        assert_eq!(v.decimals(), 0);
        assert_eq!(v.suffix(), ". Years");
        assert_eq!(v.format_target(), "5. Years");
    }

    #[test]
    fn test_only_first_literal_is_used() {
        let v = DisplayValue::parse("Top 10 of 50").unwrap();
        assert_eq!(v.prefix(), "Top ");
        assert_eq!(v.target(), 10.0);
        assert_eq!(v.suffix(), " of 50");
    }

    #[test]
    fn test_format_pads_decimals() {
        let v = DisplayValue::parse("1.87").unwrap();
        assert_eq!(v.format(0.0), "0.00");
        assert_eq!(v.format(1.5), "1.50");
    }

    #[test]
    fn test_format_floors_integers() {
        let v = DisplayValue::parse("15+").unwrap();
        assert_eq!(v.format(14.99), "14+");
    }

    #[test]
    fn test_grouped_decimal() {
        let v = DisplayValue::parse("$1,234,567.89").unwrap();
        assert_eq!(v.target(), 1234567.89);
        assert_eq!(v.format(1000.0), "$1,000.00");
        assert_eq!(v.format_target(), "$1,234,567.89");
    }

    #[test]
    fn test_round_trip() {
        for raw in [
            "$12.9B",
            "2,500+",
            "1.87",
            "-3.1%",
            "98.7%",
            "15+ Years",
            "1,000,000",
            "€0.05",
            "12,345.678 units",
            "0",
            // 超出 f64 精度的字面量
            "12345678901234567890",
            "0.12345678901234567891",
            "99999999999999999+",
            "$98,765,432,109,876,543,210.5",
        ] {
            let v = DisplayValue::parse(raw).unwrap();
            assert_eq!(v.format_target(), raw);
        }
    }

    #[test]
    fn test_multibyte_prefix() {
        let v = DisplayValue::parse("€ 42 млн").unwrap();
        assert_eq!(v.prefix(), "€ ");
        assert_eq!(v.suffix(), " млн");
        assert_eq!(v.format(21.0), "€ 21 млн");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("0"), "0");
        assert_eq!(group_thousands("999"), "999");
        assert_eq!(group_thousands("1000"), "1,000");
        assert_eq!(group_thousands("1234567.5"), "1,234,567.5");
    }
}
