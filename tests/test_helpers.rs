// ==========================================
// 集成测试辅助工具
// ==========================================
// 职责: 临时数据库/上传文件构造与通用导入器装配
// ==========================================

#![allow(dead_code)]

use exam_roster::config::ImportConfig;
use exam_roster::db::{init_roster_schema, open_sqlite_connection};
use exam_roster::domain::{Account, ImportContext};
use exam_roster::importer::RosterImporter;
use exam_roster::repository::{
    AccountRepositoryImpl, StudentRepositoryImpl, TeacherRepositoryImpl,
};
use rusqlite::Connection;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// 创建临时数据库（测试结束随 TempDir 一起清理）
pub fn create_test_db() -> (TempDir, Arc<Mutex<Connection>>) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join("roster_test.db");
    let conn = open_sqlite_connection(db_path.to_str().expect("non-utf8 temp path"))
        .expect("Failed to open test db");
    init_roster_schema(&conn).expect("Failed to init schema");
    (dir, Arc::new(Mutex::new(conn)))
}

pub type TestImporter =
    RosterImporter<AccountRepositoryImpl, StudentRepositoryImpl, TeacherRepositoryImpl>;

/// 用共享连接装配一套完整导入器
pub fn create_test_importer(conn: Arc<Mutex<Connection>>) -> TestImporter {
    RosterImporter::new(
        AccountRepositoryImpl::new(conn.clone()),
        StudentRepositoryImpl::new(conn.clone()),
        TeacherRepositoryImpl::new(conn),
        ImportConfig::default(),
    )
}

/// 一中 2027 届学校账号上下文
pub fn school_context() -> ImportContext {
    ImportContext::from_account(&Account::school_account(
        "yz01", "s3cret", "5", "一中", "2027届",
    ))
}

/// 管理员上下文
pub fn admin_context() -> ImportContext {
    ImportContext::from_account(&Account::admin_account("admin", "changeme"))
}

/// 在目录下写一个 CSV 上传文件并返回路径
pub fn write_csv(dir: &Path, filename: &str, content: &str) -> PathBuf {
    let path = dir.join(filename);
    let mut file = std::fs::File::create(&path).expect("Failed to create csv");
    file.write_all(content.as_bytes()).expect("Failed to write csv");
    path
}

/// 标准考生 CSV 表头
pub const STUDENT_CSV_HEADER: &str = "学校代码,学校名称,学届,班级代码,姓名,学籍号,考生类型,考号,科类属性";

/// 标准教师 CSV 表头
pub const TEACHER_CSV_HEADER: &str = "学校名称,姓名,身份证号,任教学届,任教学科,角色";

/// 标准账号 CSV 表头
pub const ACCOUNT_CSV_HEADER: &str = "用户名,密码,学校代码,学校简称,学届";
