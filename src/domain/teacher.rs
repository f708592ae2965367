// ==========================================
// 考务花名册管理系统 - 教师领域模型
// ==========================================
// 口径:
// - 身份码为自然键: 导入路径使用校验通过的 18 位身份证号
// - 性别/初始口令由身份证号确定性派生
// ==========================================

use crate::domain::types::{Gender, TeacherRole, TeacherSubject};
use serde::{Deserialize, Serialize};

// ==========================================
// Teacher - 监考/任课教师
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Teacher {
    pub identity_code: String,      // 身份码（自然键，全局唯一）
    pub name: String,               // 姓名
    pub school_name: String,        // 单位（学校简称）
    pub cohort: Option<String>,     // 任教学届
    pub subject: TeacherSubject,    // 任教学科
    pub role: TeacherRole,          // 角色（任课教师/科组长）
    pub gender: Option<Gender>,     // 性别（身份证路径下派生）
    pub password_hash: String,      // 口令摘要（初始口令 = 身份证后 6 位）
    pub enabled: bool,              // 是否启用
}

// ==========================================
// RawTeacherRow - 导入中间结构体
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTeacherRow {
    pub school_name: Option<String>,
    pub name: Option<String>,
    pub identity_no: Option<String>,
    pub cohort: Option<String>,
    pub subject: Option<String>,
    pub role: Option<String>,

    // 元信息: 数据行号（1 基）
    pub row_number: usize,
}
