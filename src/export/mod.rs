// ==========================================
// 考务花名册管理系统 - 花名册导出
// ==========================================
// 职责: 装配多 sheet 工作簿并序列化为 .xlsx
// ==========================================

pub mod assembler;
pub mod xlsx_writer;

// 重导出核心类型
pub use assembler::{
    ExportAssembler, Sheet, Workbook, STUDENT_EXPORT_FILENAME, STUDENT_SHEET_NAME,
    TEACHER_EXPORT_FILENAME, TEACHER_SHEET_NAME,
};
pub use xlsx_writer::{write_workbook, XlsxWriteError};
