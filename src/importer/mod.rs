// ==========================================
// 考务花名册管理系统 - 花名册导入管道
// ==========================================
// 职责: 从上传文件到落库的完整导入流程
// 流程: 解析 → 表头校验 → 批内查重 → 行级规则 → 事务落库
// ==========================================

pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod identity;
pub mod reconciler;
pub mod rules;
pub mod schema_validator;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use field_mapper::FieldMapper;
pub use file_parser::{CsvParser, ExcelParser, ParsedTable, TableParser, UniversalFileParser};
pub use identity::{parse_identity_number, IdentityProfile};
pub use reconciler::RosterImporter;
pub use rules::RowRuleEngine;
pub use schema_validator::{schema_for, validate_headers, ImportSchema, SchemaPolicy};
