// ==========================================
// 考务花名册管理系统 - 导入批次模型
// ==========================================
// 导入批次是瞬态对象: 请求期构造、内存内校验、
// 整批落库或整批丢弃，不持久化批次本身
// ==========================================

use crate::domain::types::ImportKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// RawAccountRow - 账号导入中间结构体
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawAccountRow {
    pub username: Option<String>,
    pub password: Option<String>,
    pub school_code: Option<String>,
    pub school_name: Option<String>,
    pub cohort: Option<String>,

    // 元信息: 数据行号（1 基）
    pub row_number: usize,
}

// ==========================================
// ImportOptions - 导入配置标志
// ==========================================
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ImportOptions {
    /// 先清空本范围内现有记录再导入
    ///
    /// 注意: 清空在行校验之前以独立事务提交。后续任一步骤失败时
    /// 范围内记录保持已清空状态，不回滚（既定行为，见 DESIGN.md）。
    pub replace: bool,

    /// 本次考试学生尚未分科: 忽略考生类型/科类属性两列，入库置空
    pub not_yet_tracked: bool,
}

// ==========================================
// ImportSummary - 导入成功摘要
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportSummary {
    pub batch_id: String,              // 批次 ID（UUID）
    pub kind: ImportKind,              // 导入种类
    pub total_rows: usize,             // 数据行总数
    pub inserted: usize,               // 落库行数（成功时 == total_rows）
    pub replaced_scope: bool,          // 是否先清空了范围内旧记录
    pub imported_at: DateTime<Utc>,    // 批次开始时刻
    pub elapsed_ms: u128,              // 导入耗时（毫秒）
}
