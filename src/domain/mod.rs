// ==========================================
// 考务花名册管理系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体与封闭类型集合
// 红线: 不含数据访问逻辑，不含导入管道逻辑
// ==========================================

pub mod account;
pub mod batch;
pub mod student;
pub mod teacher;
pub mod types;

// 重导出核心类型
pub use account::{hash_password, Account, ImportContext};
pub use batch::{ImportOptions, ImportSummary, RawAccountRow};
pub use student::{RawStudentRow, Student};
pub use teacher::{RawTeacherRow, Teacher};
pub use types::{ExamTrack, Gender, ImportKind, SubjectCategory, TeacherRole, TeacherSubject};
