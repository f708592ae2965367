// ==========================================
// 考务花名册管理系统 - 配置层
// ==========================================
// 职责: 导入派生规则配置
// 存储: JSON 文件（可选），缺省使用内置默认值
// ==========================================
// 班级代码派生口径依赖考号编码约定（学校代码 + 考号切片），
// 该约定随考区而变，因此作为配置项而非硬编码。
// ==========================================

use serde::{Deserialize, Serialize};
use std::path::Path;

/// 班级代码派生规则
///
/// 班级代码未随表提供时按此规则派生：
/// `school_code 左侧补零到 school_code_width` + `考号[slice_start .. slice_start + slice_len]`，
/// 派生结果长度必须等于 `class_code_len`，否则整批以 DerivationFailure 中止。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassCodeRule {
    /// 学校代码补零宽度
    pub school_code_width: usize,
    /// 考号切片起始（0 基）
    pub exam_no_slice_start: usize,
    /// 考号切片长度
    pub exam_no_slice_len: usize,
    /// 班级代码固定长度
    pub class_code_len: usize,
}

impl Default for ClassCodeRule {
    fn default() -> Self {
        // 默认约定: 学校代码 1 位 + 考号第 3~4 位（0 基 [2,4)）= 3 位班级代码
        Self {
            school_code_width: 1,
            exam_no_slice_start: 2,
            exam_no_slice_len: 2,
            class_code_len: 3,
        }
    }
}

/// 导入配置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportConfig {
    /// 班级代码派生规则
    #[serde(default)]
    pub class_code: ClassCodeRule,
}

impl ImportConfig {
    /// 从 JSON 文件加载配置；文件不存在时返回默认配置
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, anyhow::Error> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        Ok(config)
    }
}
