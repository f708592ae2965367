// ==========================================
// 考务花名册管理系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 名单批量导入校验与对账核心
// 边界: 认证/页面渲染/分页由外层承担，本库只提供
//       导入管道、花名册存储与导出装配
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 导入层 - 批量导入管道
pub mod importer;

// 导出层 - 花名册导出装配
pub mod export;

// 配置层 - 派生规则配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA/建表统一）
pub mod db;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    ExamTrack, Gender, ImportKind, SubjectCategory, TeacherRole, TeacherSubject,
};

// 领域实体
pub use domain::{
    Account, ImportContext, ImportOptions, ImportSummary, RawAccountRow, RawStudentRow,
    RawTeacherRow, Student, Teacher,
};

// 导入管道
pub use importer::{
    ImportError, ImportResult, ParsedTable, RosterImporter, RowRuleEngine, SchemaPolicy,
    UniversalFileParser,
};

// 导出装配
pub use export::{ExportAssembler, Sheet, Workbook};

// 配置
pub use config::{ClassCodeRule, ImportConfig};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "考务花名册管理系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
