// ==========================================
// 考务花名册管理系统 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 行号口径: row 一律为数据行号（1 基，表头不计）
// ==========================================

use thiserror::Error;

/// 导入模块错误类型
///
/// 所有批次级/行级错误都在任何行落库之前被检出并同步中止整批；
/// 唯一可能在提交阶段才出现的是 StorageConstraintViolation
/// （与其他范围数据的自然键冲突）。
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .xlsx/.xls/.csv）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    // ===== 批次级错误 =====
    #[error("上传数据为空")]
    EmptyUpload,

    #[error("表头不符: 缺少列 [{}]，多余列 [{}]", missing.join(", "), extra.join(", "))]
    SchemaMismatch {
        missing: Vec<String>,
        extra: Vec<String>,
    },

    #[error("批次内自然键重复 (行 {row}): {key}")]
    DuplicateKeyInBatch { row: usize, key: String },

    // ===== 行级错误 =====
    #[error("必填字段缺失 (行 {row}, 字段 {field})")]
    MissingField { row: usize, field: String },

    #[error("归属不匹配 (行 {row}, 字段 {field}): 期望 {expected}，实际 {actual}")]
    OwnershipMismatch {
        row: usize,
        field: String,
        expected: String,
        actual: String,
    },

    #[error("枚举值非法 (行 {row}, 字段 {field}): {value}")]
    InvalidEnumValue {
        row: usize,
        field: String,
        value: String,
    },

    #[error("长度不符 (行 {row}, 字段 {field}): 期望 {expected} 位，实际 {actual} 位")]
    InvalidLength {
        row: usize,
        field: String,
        expected: usize,
        actual: usize,
    },

    #[error("派生失败 (行 {row}): {reason}")]
    DerivationFailure { row: usize, reason: String },

    // 身份证号不回显（敏感字段），只报行号
    #[error("身份证号非法 (行 {row})")]
    InvalidIdentityNumber { row: usize },

    // ===== 存储层错误 =====
    #[error("存储唯一约束冲突: {detail}")]
    StorageConstraintViolation { detail: String },

    #[error("存储层错误: {0}")]
    Storage(String),

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ImportError {
    /// 发生错误的数据行号（批次级错误返回 None）
    pub fn row(&self) -> Option<usize> {
        match self {
            ImportError::DuplicateKeyInBatch { row, .. }
            | ImportError::MissingField { row, .. }
            | ImportError::OwnershipMismatch { row, .. }
            | ImportError::InvalidEnumValue { row, .. }
            | ImportError::InvalidLength { row, .. }
            | ImportError::DerivationFailure { row, .. }
            | ImportError::InvalidIdentityNumber { row } => Some(*row),
            _ => None,
        }
    }
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

// 仓储层错误映射: 唯一约束冲突单独成类，区别于行级数据质量错误
impl From<crate::repository::RepositoryError> for ImportError {
    fn from(err: crate::repository::RepositoryError) -> Self {
        match err {
            crate::repository::RepositoryError::UniqueConstraintViolation(detail) => {
                ImportError::StorageConstraintViolation { detail }
            }
            other => ImportError::Storage(other.to_string()),
        }
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
