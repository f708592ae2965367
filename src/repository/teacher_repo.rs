// ==========================================
// 考务花名册管理系统 - 教师仓储
// ==========================================
// 红线: Repository 不含业务规则，只做数据映射
// ==========================================

use crate::domain::types::{Gender, TeacherRole, TeacherSubject};
use crate::domain::Teacher;
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// TeacherRepository Trait
// ==========================================
#[async_trait]
pub trait TeacherRepository: Send + Sync {
    /// 批量插入教师（单事务，任一行失败整体回滚）
    async fn batch_insert(&self, teachers: Vec<Teacher>) -> RepositoryResult<usize>;

    /// 删除指定学校的全部教师
    async fn delete_by_school(&self, school_name: &str) -> RepositoryResult<usize>;

    /// 按学校查询教师；school_name 为 None 时返回全部（管理员导出）
    async fn list_by_school(&self, school_name: Option<&str>) -> RepositoryResult<Vec<Teacher>>;
}

// ==========================================
// TeacherRepositoryImpl
// ==========================================
pub struct TeacherRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl TeacherRepositoryImpl {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn row_to_teacher(row: &rusqlite::Row) -> rusqlite::Result<Teacher> {
        let subject: String = row.get("subject")?;
        let role: String = row.get("role")?;
        let gender: Option<String> = row.get("gender")?;
        let enabled: i64 = row.get("enabled")?;
        Ok(Teacher {
            identity_code: row.get("identity_code")?,
            name: row.get("name")?,
            school_name: row.get("school_name")?,
            cohort: row.get("cohort")?,
            // 落库值由导入路径保证合法，解析失败视为数据损坏
            subject: TeacherSubject::parse(&subject).unwrap_or(TeacherSubject::Physics),
            role: TeacherRole::parse(&role).unwrap_or(TeacherRole::SubjectTeacher),
            gender: gender.as_deref().and_then(Gender::parse),
            password_hash: row.get("password_hash")?,
            enabled: enabled != 0,
        })
    }
}

#[async_trait]
impl TeacherRepository for TeacherRepositoryImpl {
    async fn batch_insert(&self, teachers: Vec<Teacher>) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let mut count = 0;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO teacher (
                    identity_code, name, school_name, cohort,
                    subject, role, gender, password_hash, enabled
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                "#,
            )?;
            for teacher in &teachers {
                stmt.execute(params![
                    teacher.identity_code,
                    teacher.name,
                    teacher.school_name,
                    teacher.cohort,
                    teacher.subject.as_str(),
                    teacher.role.as_str(),
                    teacher.gender.map(|g| g.as_str().to_string()),
                    teacher.password_hash,
                    teacher.enabled as i64,
                ])?;
                count += 1;
            }
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(count)
    }

    async fn delete_by_school(&self, school_name: &str) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let deleted = conn.execute(
            "DELETE FROM teacher WHERE school_name = ?1",
            params![school_name],
        )?;
        Ok(deleted)
    }

    async fn list_by_school(&self, school_name: Option<&str>) -> RepositoryResult<Vec<Teacher>> {
        let conn = self.get_conn()?;

        let (sql, bindings): (&str, Vec<String>) = match school_name {
            Some(name) => (
                "SELECT * FROM teacher WHERE school_name = ?1 ORDER BY subject, name",
                vec![name.to_string()],
            ),
            None => ("SELECT * FROM teacher ORDER BY school_name, subject, name", vec![]),
        };

        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(bindings), Self::row_to_teacher)?;
        let mut teachers = Vec::new();
        for row in rows {
            teachers.push(row?);
        }
        Ok(teachers)
    }
}
