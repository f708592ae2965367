// ==========================================
// 考务花名册管理系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 统一花名册建表语句（account / student / teacher）
// ==========================================

use rusqlite::Connection;
use std::path::PathBuf;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 默认数据库文件名
pub const DEFAULT_DB_FILENAME: &str = "exam_roster.db";

/// 默认数据库路径: 用户数据目录下的 exam-roster/exam_roster.db，
/// 数据目录不可用时退回当前目录
pub fn default_db_path() -> PathBuf {
    match dirs::data_dir() {
        Some(dir) => dir.join("exam-roster").join(DEFAULT_DB_FILENAME),
        None => PathBuf::from(DEFAULT_DB_FILENAME),
    }
}

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 初始化花名册 schema（幂等）
///
/// 自然键唯一约束：
/// - account.username
/// - student.exam_no（考号全局唯一，跨学校）
/// - teacher.identity_code
pub fn init_roster_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS account (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            username      TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            is_admin      INTEGER NOT NULL DEFAULT 0,
            school_code   TEXT,
            school_name   TEXT,
            cohort        TEXT
        );

        CREATE TABLE IF NOT EXISTS student (
            id               INTEGER PRIMARY KEY AUTOINCREMENT,
            school_code      TEXT NOT NULL,
            school_name      TEXT NOT NULL,
            cohort           TEXT NOT NULL,
            class_code       TEXT NOT NULL,
            name             TEXT NOT NULL,
            student_id       TEXT,
            exam_track       TEXT,
            exam_no          TEXT NOT NULL UNIQUE,
            subject_category TEXT
        );
        CREATE INDEX IF NOT EXISTS idx_student_scope ON student(school_name, cohort);

        CREATE TABLE IF NOT EXISTS teacher (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            identity_code TEXT NOT NULL UNIQUE,
            name          TEXT NOT NULL,
            school_name   TEXT NOT NULL,
            cohort        TEXT,
            subject       TEXT NOT NULL,
            role          TEXT NOT NULL,
            gender        TEXT,
            password_hash TEXT NOT NULL,
            enabled       INTEGER NOT NULL DEFAULT 1
        );
        CREATE INDEX IF NOT EXISTS idx_teacher_school ON teacher(school_name);
        "#,
    )
}
