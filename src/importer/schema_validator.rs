// ==========================================
// 考务花名册管理系统 - 表头 schema 校验器
// ==========================================
// 职责: 上传表头集合 vs 期望表头集合，计算缺少列/多余列
// 口径: 纯集合比较，与列顺序无关（精确匹配也比集合，不比序列）
// 时机: 每批执行一次，先于任何行级检查
// ==========================================

use crate::domain::types::ImportKind;
use crate::importer::error::{ImportError, ImportResult};
use std::collections::HashSet;

// ==========================================
// SchemaPolicy - 校验策略
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaPolicy {
    /// 精确匹配: 缺少列或多余列任一非空即失败
    Exact,
    /// 子集匹配: 仅缺少必需列失败，多余列容忍（导入格式带可选列）
    Subset,
}

// ==========================================
// ImportSchema - 每种导入的期望表头
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct ImportSchema {
    pub required: &'static [&'static str],
    pub policy: SchemaPolicy,
}

/// 考生名单: 班级代码/考生类型/科类属性为可选列（未分科、派生班级代码），
/// 故采用子集匹配
pub const STUDENT_SCHEMA: ImportSchema = ImportSchema {
    required: &["学校代码", "学校名称", "学届", "姓名", "学籍号", "考号"],
    policy: SchemaPolicy::Subset,
};

/// 考生名单的可选列
pub const STUDENT_OPTIONAL_COLUMNS: &[&str] = &["班级代码", "考生类型", "科类属性"];

/// 教师名单: 精确匹配
pub const TEACHER_SCHEMA: ImportSchema = ImportSchema {
    required: &["学校名称", "姓名", "身份证号", "任教学届", "任教学科", "角色"],
    policy: SchemaPolicy::Exact,
};

/// 学校账号名单: 精确匹配
pub const ACCOUNT_SCHEMA: ImportSchema = ImportSchema {
    required: &["用户名", "密码", "学校代码", "学校简称", "学届"],
    policy: SchemaPolicy::Exact,
};

/// 按导入种类取期望 schema
pub fn schema_for(kind: ImportKind) -> ImportSchema {
    match kind {
        ImportKind::Students => STUDENT_SCHEMA,
        ImportKind::Teachers => TEACHER_SCHEMA,
        ImportKind::Accounts => ACCOUNT_SCHEMA,
    }
}

/// 校验上传表头
///
/// missing = required − present，extra = present − required。
/// 失败时两个集合一并带回，供外层渲染可操作的提示。
pub fn validate_headers(present: &[String], schema: &ImportSchema) -> ImportResult<()> {
    let present_set: HashSet<&str> = present.iter().map(|h| h.as_str()).collect();
    let required_set: HashSet<&str> = schema.required.iter().copied().collect();

    let mut missing: Vec<String> = required_set
        .difference(&present_set)
        .map(|h| h.to_string())
        .collect();
    let mut extra: Vec<String> = present_set
        .difference(&required_set)
        .filter(|h| !h.is_empty())
        .map(|h| h.to_string())
        .collect();

    // 输出有序，保证报错信息稳定可测
    missing.sort();
    extra.sort();

    let failed = match schema.policy {
        SchemaPolicy::Exact => !missing.is_empty() || !extra.is_empty(),
        SchemaPolicy::Subset => !missing.is_empty(),
    };

    if failed {
        return Err(ImportError::SchemaMismatch { missing, extra });
    }
    Ok(())
}
