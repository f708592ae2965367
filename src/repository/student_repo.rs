// ==========================================
// 考务花名册管理系统 - 考生仓储
// ==========================================
// 红线: Repository 不含业务规则，只做数据映射
// 约束: 所有查询使用参数化，防止 SQL 注入
// ==========================================

use crate::domain::types::{ExamTrack, SubjectCategory};
use crate::domain::Student;
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// StudentRepository Trait
// ==========================================
// 用途: 考生数据访问
// 实现者: StudentRepositoryImpl（使用 rusqlite）
#[async_trait]
pub trait StudentRepository: Send + Sync {
    /// 批量插入考生（单事务，任一行失败整体回滚）
    ///
    /// # 返回
    /// - Ok(usize): 成功插入的记录数
    /// - Err: 数据库错误（含考号唯一约束冲突）
    async fn batch_insert(&self, students: Vec<Student>) -> RepositoryResult<usize>;

    /// 删除指定范围（学校名称 + 学届）内的全部考生
    ///
    /// # 返回
    /// - Ok(usize): 删除的记录数
    async fn delete_by_scope(&self, school_name: &str, cohort: &str) -> RepositoryResult<usize>;

    /// 按范围查询考生；scope 为 None 时返回全部（管理员导出）
    async fn list_by_scope(&self, scope: Option<(&str, &str)>) -> RepositoryResult<Vec<Student>>;

    /// 范围内考生数
    async fn count_by_scope(&self, school_name: &str, cohort: &str) -> RepositoryResult<usize>;
}

// ==========================================
// StudentRepositoryImpl
// ==========================================
pub struct StudentRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl StudentRepositoryImpl {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn row_to_student(row: &rusqlite::Row) -> rusqlite::Result<Student> {
        let exam_track: Option<String> = row.get("exam_track")?;
        let subject_category: Option<String> = row.get("subject_category")?;
        Ok(Student {
            school_code: row.get("school_code")?,
            school_name: row.get("school_name")?,
            cohort: row.get("cohort")?,
            class_code: row.get("class_code")?,
            name: row.get("name")?,
            student_id: row.get("student_id")?,
            exam_track: exam_track.as_deref().and_then(ExamTrack::parse),
            exam_no: row.get("exam_no")?,
            subject_category: subject_category.as_deref().and_then(SubjectCategory::parse),
        })
    }
}

#[async_trait]
impl StudentRepository for StudentRepositoryImpl {
    async fn batch_insert(&self, students: Vec<Student>) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let mut count = 0;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO student (
                    school_code, school_name, cohort, class_code, name,
                    student_id, exam_track, exam_no, subject_category
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                "#,
            )?;
            for student in &students {
                stmt.execute(params![
                    student.school_code,
                    student.school_name,
                    student.cohort,
                    student.class_code,
                    student.name,
                    student.student_id,
                    student.exam_track.map(|t| t.as_str().to_string()),
                    student.exam_no,
                    student.subject_category.map(|c| c.as_str().to_string()),
                ])?;
                count += 1;
            }
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(count)
    }

    async fn delete_by_scope(&self, school_name: &str, cohort: &str) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let deleted = conn.execute(
            "DELETE FROM student WHERE school_name = ?1 AND cohort = ?2",
            params![school_name, cohort],
        )?;
        Ok(deleted)
    }

    async fn list_by_scope(&self, scope: Option<(&str, &str)>) -> RepositoryResult<Vec<Student>> {
        let conn = self.get_conn()?;

        // 导出顺序: 班级代码 → 考号，保证同班连续
        let (sql, bindings): (&str, Vec<String>) = match scope {
            Some((school_name, cohort)) => (
                "SELECT * FROM student WHERE school_name = ?1 AND cohort = ?2 \
                 ORDER BY class_code, exam_no",
                vec![school_name.to_string(), cohort.to_string()],
            ),
            None => (
                "SELECT * FROM student ORDER BY school_code, class_code, exam_no",
                vec![],
            ),
        };

        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(bindings), Self::row_to_student)?;
        let mut students = Vec::new();
        for row in rows {
            students.push(row?);
        }
        Ok(students)
    }

    async fn count_by_scope(&self, school_name: &str, cohort: &str) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM student WHERE school_name = ?1 AND cohort = ?2",
            params![school_name, cohort],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}
