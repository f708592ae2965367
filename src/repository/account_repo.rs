// ==========================================
// 考务花名册管理系统 - 账号仓储
// ==========================================
// 红线: Repository 不含业务规则，只做数据映射
// 口径: 替换式账号导入只清非管理员账号，管理员账号永不被批量删除
// ==========================================

use crate::domain::Account;
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// AccountRepository Trait
// ==========================================
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// 批量插入账号（单事务，任一行失败整体回滚）
    async fn batch_insert(&self, accounts: Vec<Account>) -> RepositoryResult<usize>;

    /// 删除全部非管理员账号
    async fn delete_non_admin(&self) -> RepositoryResult<usize>;

    /// 按用户名查账号
    async fn find_by_username(&self, username: &str) -> RepositoryResult<Option<Account>>;

    /// 写入或更新管理员账号（create_admin 工具使用）
    async fn upsert_admin(&self, account: &Account) -> RepositoryResult<()>;

    /// 账号列表（管理员视图）
    async fn list_all(&self) -> RepositoryResult<Vec<Account>>;
}

// ==========================================
// AccountRepositoryImpl
// ==========================================
pub struct AccountRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl AccountRepositoryImpl {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn row_to_account(row: &rusqlite::Row) -> rusqlite::Result<Account> {
        let is_admin: i64 = row.get("is_admin")?;
        Ok(Account {
            id: row.get("id")?,
            username: row.get("username")?,
            password_hash: row.get("password_hash")?,
            is_admin: is_admin != 0,
            school_code: row.get("school_code")?,
            school_name: row.get("school_name")?,
            cohort: row.get("cohort")?,
        })
    }
}

#[async_trait]
impl AccountRepository for AccountRepositoryImpl {
    async fn batch_insert(&self, accounts: Vec<Account>) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let mut count = 0;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO account (
                    username, password_hash, is_admin,
                    school_code, school_name, cohort
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )?;
            for account in &accounts {
                stmt.execute(params![
                    account.username,
                    account.password_hash,
                    account.is_admin as i64,
                    account.school_code,
                    account.school_name,
                    account.cohort,
                ])?;
                count += 1;
            }
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(count)
    }

    async fn delete_non_admin(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let deleted = conn.execute("DELETE FROM account WHERE is_admin = 0", [])?;
        Ok(deleted)
    }

    async fn find_by_username(&self, username: &str) -> RepositoryResult<Option<Account>> {
        let conn = self.get_conn()?;
        let account = conn
            .query_row(
                "SELECT * FROM account WHERE username = ?1",
                params![username],
                Self::row_to_account,
            )
            .optional()?;
        Ok(account)
    }

    async fn upsert_admin(&self, account: &Account) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO account (username, password_hash, is_admin)
            VALUES (?1, ?2, 1)
            ON CONFLICT(username) DO UPDATE SET
                password_hash = excluded.password_hash,
                is_admin = 1
            "#,
            params![account.username, account.password_hash],
        )?;
        Ok(())
    }

    async fn list_all(&self) -> RepositoryResult<Vec<Account>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT * FROM account ORDER BY is_admin DESC, username")?;
        let rows = stmt.query_map([], Self::row_to_account)?;
        let mut accounts = Vec::new();
        for row in rows {
            accounts.push(row?);
        }
        Ok(accounts)
    }
}
