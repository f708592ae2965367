// ==========================================
// 考务花名册管理系统 - 身份证号校验与派生
// ==========================================
// 口径（教师身份证导入路径）:
// - 恰好 18 位；前 17 位为数字；末位为数字或 X/x
// - 内嵌出生日期做区间合理性检查（非完整日历校验）:
//   年 ∈ [1900, 2100]，月 ∈ [1, 12]，日 ∈ [1, 31]
// - 性别 = 第 17 位（倒数第二位）奇偶: 奇 → 男，偶 → 女
// - 初始口令 = 后 6 位
// ==========================================

use crate::domain::types::Gender;

/// 身份证号派生信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityProfile {
    pub gender: Gender,
    /// 初始口令明文（后 6 位）；调用方负责散列后落库
    pub default_credential: String,
}

/// 校验身份证号并派生性别/初始口令；非法返回 None
pub fn parse_identity_number(raw: &str) -> Option<IdentityProfile> {
    let trimmed = raw.trim();
    let chars: Vec<char> = trimmed.chars().collect();

    // 长度恰好 18
    if chars.len() != 18 {
        return None;
    }

    // 前 17 位必须为 ASCII 数字
    if !chars[..17].iter().all(|c| c.is_ascii_digit()) {
        return None;
    }

    // 末位为数字或 X/x
    let last = chars[17];
    if !(last.is_ascii_digit() || last == 'X' || last == 'x') {
        return None;
    }

    // 出生日期区间检查（位 7-14: YYYYMMDD）
    let year: u32 = trimmed[6..10].parse().ok()?;
    let month: u32 = trimmed[10..12].parse().ok()?;
    let day: u32 = trimmed[12..14].parse().ok()?;
    if !(1900..=2100).contains(&year) || !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }

    // 性别位: 第 17 位
    let seq_digit = chars[16].to_digit(10)?;
    let gender = if seq_digit % 2 == 1 {
        Gender::Male
    } else {
        Gender::Female
    };

    Some(IdentityProfile {
        gender,
        default_credential: trimmed[12..].to_string(),
    })
}
