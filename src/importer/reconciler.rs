// ==========================================
// 考务花名册管理系统 - 花名册导入控制器
// ==========================================
// 职责: 整合导入流程，从文件到数据库
// 流程: 解析 → 空表检查 → 表头校验 → 批内查重 →
//       （替换式）清空范围 → 行级校验映射 → 单事务落库
// 门禁语义: 任一门禁失败整批中止，已通过的行不落库；
//           唯一例外是替换式导入的清空步骤，它在行校验之前
//           以独立事务提交，失败批次会留下已清空的范围
// ==========================================

use crate::config::ImportConfig;
use crate::domain::types::ImportKind;
use crate::domain::{ImportContext, ImportOptions, ImportSummary};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::FieldMapper;
use crate::importer::file_parser::{ParsedTable, UniversalFileParser};
use crate::importer::rules::RowRuleEngine;
use crate::importer::schema_validator::{schema_for, validate_headers};
use crate::repository::{AccountRepository, StudentRepository, TeacherRepository};
use std::collections::HashMap;
use std::path::Path;
use chrono::Utc;
use std::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

// ==========================================
// RosterImporter - 花名册导入控制器
// ==========================================
pub struct RosterImporter<A, S, T>
where
    A: AccountRepository,
    S: StudentRepository,
    T: TeacherRepository,
{
    account_repo: A,
    student_repo: S,
    teacher_repo: T,

    file_parser: UniversalFileParser,
    field_mapper: FieldMapper,
    rule_engine: RowRuleEngine,
}

impl<A, S, T> RosterImporter<A, S, T>
where
    A: AccountRepository,
    S: StudentRepository,
    T: TeacherRepository,
{
    pub fn new(account_repo: A, student_repo: S, teacher_repo: T, config: ImportConfig) -> Self {
        Self {
            account_repo,
            student_repo,
            teacher_repo,
            file_parser: UniversalFileParser,
            field_mapper: FieldMapper,
            rule_engine: RowRuleEngine::new(config.class_code),
        }
    }

    // ==========================================
    // 考生导入
    // ==========================================
    pub async fn import_students<P: AsRef<Path>>(
        &self,
        file_path: P,
        ctx: &ImportContext,
        options: &ImportOptions,
    ) -> ImportResult<ImportSummary> {
        let start = Instant::now();
        let imported_at = Utc::now();
        let batch_id = Uuid::new_v4().to_string();
        info!(
            batch_id = %batch_id,
            operator = %ctx.username,
            school = %ctx.school_name,
            cohort = %ctx.cohort,
            replace = options.replace,
            not_yet_tracked = options.not_yet_tracked,
            "开始导入考生花名册"
        );

        let table = self.parse_and_gate(&file_path, ImportKind::Students)?;
        let total_rows = table.rows.len();

        // 批内查重: 考号
        check_in_batch_duplicates(&table, "考号")?;

        // 替换式: 清空本校本届旧记录（独立事务，先于行校验提交）
        if options.replace {
            let deleted = self
                .student_repo
                .delete_by_scope(&ctx.school_name, &ctx.cohort)
                .await?;
            warn!(
                batch_id = %batch_id,
                deleted = deleted,
                "替换式导入: 已清空范围内旧考生记录"
            );
        }

        // 行级校验 + 归一化（首错即停）
        debug!(batch_id = %batch_id, rows = total_rows, "行级校验");
        let mut students = Vec::with_capacity(total_rows);
        for (idx, row) in table.rows.iter().enumerate() {
            let raw = self.field_mapper.map_student(row, idx + 1);
            students.push(
                self.rule_engine
                    .normalize_student(&raw, ctx, options.not_yet_tracked)?,
            );
        }

        // 单事务落库；跨范围考号冲突在此浮现为存储约束冲突
        let inserted = self.student_repo.batch_insert(students).await?;

        let summary = ImportSummary {
            batch_id,
            kind: ImportKind::Students,
            total_rows,
            inserted,
            replaced_scope: options.replace,
            imported_at,
            elapsed_ms: start.elapsed().as_millis(),
        };
        info!(
            batch_id = %summary.batch_id,
            inserted = summary.inserted,
            elapsed_ms = summary.elapsed_ms as u64,
            "考生花名册导入完成"
        );
        Ok(summary)
    }

    // ==========================================
    // 教师导入
    // ==========================================
    pub async fn import_teachers<P: AsRef<Path>>(
        &self,
        file_path: P,
        ctx: &ImportContext,
        options: &ImportOptions,
    ) -> ImportResult<ImportSummary> {
        let start = Instant::now();
        let imported_at = Utc::now();
        let batch_id = Uuid::new_v4().to_string();
        info!(
            batch_id = %batch_id,
            operator = %ctx.username,
            school = %ctx.school_name,
            replace = options.replace,
            "开始导入教师名单"
        );

        let table = self.parse_and_gate(&file_path, ImportKind::Teachers)?;
        let total_rows = table.rows.len();

        // 批内查重: 身份证号
        check_in_batch_duplicates(&table, "身份证号")?;

        if options.replace {
            let deleted = self.teacher_repo.delete_by_school(&ctx.school_name).await?;
            warn!(
                batch_id = %batch_id,
                deleted = deleted,
                "替换式导入: 已清空本校旧教师记录"
            );
        }

        debug!(batch_id = %batch_id, rows = total_rows, "行级校验");
        let mut teachers = Vec::with_capacity(total_rows);
        for (idx, row) in table.rows.iter().enumerate() {
            let raw = self.field_mapper.map_teacher(row, idx + 1);
            teachers.push(self.rule_engine.normalize_teacher(&raw, ctx)?);
        }

        let inserted = self.teacher_repo.batch_insert(teachers).await?;

        let summary = ImportSummary {
            batch_id,
            kind: ImportKind::Teachers,
            total_rows,
            inserted,
            replaced_scope: options.replace,
            imported_at,
            elapsed_ms: start.elapsed().as_millis(),
        };
        info!(
            batch_id = %summary.batch_id,
            inserted = summary.inserted,
            elapsed_ms = summary.elapsed_ms as u64,
            "教师名单导入完成"
        );
        Ok(summary)
    }

    // ==========================================
    // 账号导入（仅管理员）
    // ==========================================
    pub async fn import_accounts<P: AsRef<Path>>(
        &self,
        file_path: P,
        ctx: &ImportContext,
        options: &ImportOptions,
    ) -> ImportResult<ImportSummary> {
        if !ctx.is_admin {
            return Err(ImportError::Other(anyhow::anyhow!(
                "账号导入仅限管理员操作"
            )));
        }

        let start = Instant::now();
        let imported_at = Utc::now();
        let batch_id = Uuid::new_v4().to_string();
        info!(
            batch_id = %batch_id,
            operator = %ctx.username,
            replace = options.replace,
            "开始导入学校账号"
        );

        let table = self.parse_and_gate(&file_path, ImportKind::Accounts)?;
        let total_rows = table.rows.len();

        // 批内查重: 用户名
        check_in_batch_duplicates(&table, "用户名")?;

        // 替换式: 只清非管理员账号，管理员账号永不被批量删除
        if options.replace {
            let deleted = self.account_repo.delete_non_admin().await?;
            warn!(
                batch_id = %batch_id,
                deleted = deleted,
                "替换式导入: 已清空非管理员账号"
            );
        }

        debug!(batch_id = %batch_id, rows = total_rows, "行级校验");
        let mut accounts = Vec::with_capacity(total_rows);
        for (idx, row) in table.rows.iter().enumerate() {
            let raw = self.field_mapper.map_account(row, idx + 1);
            accounts.push(self.rule_engine.normalize_account(&raw)?);
        }

        let inserted = self.account_repo.batch_insert(accounts).await?;

        let summary = ImportSummary {
            batch_id,
            kind: ImportKind::Accounts,
            total_rows,
            inserted,
            replaced_scope: options.replace,
            imported_at,
            elapsed_ms: start.elapsed().as_millis(),
        };
        info!(
            batch_id = %summary.batch_id,
            inserted = summary.inserted,
            elapsed_ms = summary.elapsed_ms as u64,
            "学校账号导入完成"
        );
        Ok(summary)
    }

    // ==========================================
    // 前置门禁: 解析 → 空表 → 表头
    // ==========================================
    fn parse_and_gate<P: AsRef<Path>>(
        &self,
        file_path: &P,
        kind: ImportKind,
    ) -> ImportResult<ParsedTable> {
        let table = self.file_parser.parse(file_path)?;

        if table.rows.is_empty() {
            return Err(ImportError::EmptyUpload);
        }

        validate_headers(&table.headers, &schema_for(kind))?;
        debug!(kind = %kind, rows = table.rows.len(), "门禁通过");
        Ok(table)
    }
}

// ==========================================
// 批内自然键查重
// ==========================================
// 报重复出现行的行号；键裁剪后比较，空键不参与
// （空键由行级必填校验报 MissingField，定位更准）
fn check_in_batch_duplicates(table: &ParsedTable, key_column: &str) -> ImportResult<()> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    for (idx, row) in table.rows.iter().enumerate() {
        let row_number = idx + 1;
        let key = match row.get(key_column).map(|v| v.trim()) {
            Some(k) if !k.is_empty() => k.to_string(),
            _ => continue,
        };
        if seen.contains_key(&key) {
            return Err(ImportError::DuplicateKeyInBatch {
                row: row_number,
                key,
            });
        }
        seen.insert(key, row_number);
    }
    Ok(())
}
