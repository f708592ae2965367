// ==========================================
// 考务花名册管理系统 - 行级规则引擎
// ==========================================
// 职责: 单行域校验 + 归一化（规则表驱动，固定顺序，首错即停）
// 顺序: 归属匹配 → 枚举成员 → 定长编码 → 派生字段 → 身份证校验
// 红线: 引擎只读显式传入的 ImportContext，不碰任何会话态
// ==========================================

use crate::config::ClassCodeRule;
use crate::domain::types::{ExamTrack, SubjectCategory, TeacherRole, TeacherSubject};
use crate::domain::{
    hash_password, Account, ImportContext, RawAccountRow, RawStudentRow, RawTeacherRow, Student,
    Teacher,
};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::identity::parse_identity_number;

// 固定长度口径
const EXAM_NO_LEN: usize = 10;

// ==========================================
// RowRuleEngine
// ==========================================
pub struct RowRuleEngine {
    class_code: ClassCodeRule,
}

// 规则表条目: (规则名, 校验函数)。校验函数无副作用，便于独立单测
type StudentRule = fn(&RowRuleEngine, &RawStudentRow, &StudentRowScope) -> ImportResult<()>;
type TeacherRule = fn(&RowRuleEngine, &RawTeacherRow, &ImportContext) -> ImportResult<()>;

/// 考生行规则，按声明顺序执行
const STUDENT_RULES: &[(&str, StudentRule)] = &[
    ("ownership_school", RowRuleEngine::student_school_matches),
    ("ownership_cohort", RowRuleEngine::student_cohort_matches),
    ("required_fields", RowRuleEngine::student_required_fields),
    ("exam_track_membership", RowRuleEngine::student_track_in_taxonomy),
    ("subject_category_consistency", RowRuleEngine::student_category_consistent),
    ("exam_no_length", RowRuleEngine::student_exam_no_length),
    ("class_code_length", RowRuleEngine::student_class_code_length),
];

/// 教师行规则，按声明顺序执行
const TEACHER_RULES: &[(&str, TeacherRule)] = &[
    ("ownership_school", RowRuleEngine::teacher_school_matches),
    ("required_fields", RowRuleEngine::teacher_required_fields),
    ("subject_membership", RowRuleEngine::teacher_subject_in_taxonomy),
    ("role_membership", RowRuleEngine::teacher_role_in_taxonomy),
    ("identity_number", RowRuleEngine::teacher_identity_valid),
];

/// 考生行的校验语境（上下文 + 批次标志）
pub struct StudentRowScope<'a> {
    pub ctx: &'a ImportContext,
    /// 尚未分科: 考生类型/科类属性两列整体忽略
    pub not_yet_tracked: bool,
}

impl RowRuleEngine {
    pub fn new(class_code: ClassCodeRule) -> Self {
        Self { class_code }
    }

    // ==========================================
    // 考生行: 校验 + 归一化
    // ==========================================
    pub fn normalize_student(
        &self,
        row: &RawStudentRow,
        ctx: &ImportContext,
        not_yet_tracked: bool,
    ) -> ImportResult<Student> {
        let scope = StudentRowScope {
            ctx,
            not_yet_tracked,
        };
        for (_name, rule) in STUDENT_RULES {
            rule(self, row, &scope)?;
        }

        let exam_no = trimmed(&row.exam_no);
        let school_code = trimmed(&row.school_code);

        // 考生类型/科类属性: 未分科导入整体置空；否则按列值解析，
        // 科类属性缺失时由考生类型首字符派生
        let (exam_track, subject_category) = if not_yet_tracked {
            (None, None)
        } else {
            let track = row.exam_track.as_deref().and_then(ExamTrack::parse);
            let category = match (&track, row.subject_category.as_deref()) {
                (Some(t), None) => Some(t.category()),
                (Some(t), Some(_)) => Some(t.category()),
                (None, Some(raw)) => SubjectCategory::parse(raw),
                (None, None) => None,
            };
            (track, category)
        };

        // 班级代码: 未随表提供时按配置规则派生
        let class_code = match row.class_code.as_deref() {
            Some(code) => code.trim().to_string(),
            None => self.derive_class_code(&school_code, &exam_no, row.row_number)?,
        };

        Ok(Student {
            school_code,
            school_name: trimmed(&row.school_name),
            cohort: trimmed(&row.cohort),
            class_code,
            name: trimmed(&row.name),
            student_id: row.student_id.clone(),
            exam_track,
            exam_no,
            subject_category,
        })
    }

    // ==========================================
    // 教师行: 校验 + 归一化
    // ==========================================
    pub fn normalize_teacher(&self, row: &RawTeacherRow, ctx: &ImportContext) -> ImportResult<Teacher> {
        for (_name, rule) in TEACHER_RULES {
            rule(self, row, ctx)?;
        }

        let identity_no = trimmed(&row.identity_no);
        // TEACHER_RULES 已保证身份证号合法
        let profile = parse_identity_number(&identity_no)
            .ok_or(ImportError::InvalidIdentityNumber { row: row.row_number })?;

        // subject/role 同理已通过枚举成员校验
        let subject = row
            .subject
            .as_deref()
            .and_then(TeacherSubject::parse)
            .ok_or_else(|| invalid_enum(row.row_number, "任教学科", &row.subject))?;
        let role = row
            .role
            .as_deref()
            .and_then(TeacherRole::parse)
            .ok_or_else(|| invalid_enum(row.row_number, "角色", &row.role))?;

        Ok(Teacher {
            password_hash: hash_password(&identity_no, &profile.default_credential),
            identity_code: identity_no,
            name: trimmed(&row.name),
            school_name: trimmed(&row.school_name),
            cohort: row.cohort.clone(),
            subject,
            role,
            gender: Some(profile.gender),
            enabled: true,
        })
    }

    // ==========================================
    // 账号行: 校验 + 归一化
    // ==========================================
    // 账号批次由管理员上传，行内不做归属匹配；
    // 非管理员账号的挂靠三元组必填
    pub fn normalize_account(&self, row: &RawAccountRow) -> ImportResult<Account> {
        let username = require(row.row_number, "用户名", &row.username)?;
        let password = require(row.row_number, "密码", &row.password)?;
        let school_code = require(row.row_number, "学校代码", &row.school_code)?;
        let school_name = require(row.row_number, "学校简称", &row.school_name)?;
        let cohort = require(row.row_number, "学届", &row.cohort)?;

        Ok(Account::school_account(
            &username,
            &password,
            &school_code,
            &school_name,
            &cohort,
        ))
    }

    // ==========================================
    // 考生规则实现
    // ==========================================

    fn student_school_matches(
        &self,
        row: &RawStudentRow,
        scope: &StudentRowScope,
    ) -> ImportResult<()> {
        ownership_match(
            row.row_number,
            "学校名称",
            &scope.ctx.school_name,
            row.school_name.as_deref(),
        )
    }

    fn student_cohort_matches(
        &self,
        row: &RawStudentRow,
        scope: &StudentRowScope,
    ) -> ImportResult<()> {
        ownership_match(
            row.row_number,
            "学届",
            &scope.ctx.cohort,
            row.cohort.as_deref(),
        )
    }

    fn student_required_fields(
        &self,
        row: &RawStudentRow,
        _scope: &StudentRowScope,
    ) -> ImportResult<()> {
        require(row.row_number, "姓名", &row.name)?;
        require(row.row_number, "学校代码", &row.school_code)?;
        require(row.row_number, "考号", &row.exam_no)?;
        Ok(())
    }

    fn student_track_in_taxonomy(
        &self,
        row: &RawStudentRow,
        scope: &StudentRowScope,
    ) -> ImportResult<()> {
        if scope.not_yet_tracked {
            return Ok(());
        }
        // 考生类型为空合法（未分科行）；非空必须属于 12 种组合
        match row.exam_track.as_deref() {
            None => Ok(()),
            Some(raw) if ExamTrack::parse(raw).is_some() => Ok(()),
            Some(raw) => Err(ImportError::InvalidEnumValue {
                row: row.row_number,
                field: "考生类型".to_string(),
                value: raw.to_string(),
            }),
        }
    }

    fn student_category_consistent(
        &self,
        row: &RawStudentRow,
        scope: &StudentRowScope,
    ) -> ImportResult<()> {
        if scope.not_yet_tracked {
            return Ok(());
        }
        let supplied = match row.subject_category.as_deref() {
            None => return Ok(()),
            Some(raw) => raw,
        };
        let category = SubjectCategory::parse(supplied).ok_or_else(|| {
            ImportError::InvalidEnumValue {
                row: row.row_number,
                field: "科类属性".to_string(),
                value: supplied.to_string(),
            }
        })?;
        // 与考生类型同在时必须一致
        if let Some(track) = row.exam_track.as_deref().and_then(ExamTrack::parse) {
            if track.category() != category {
                return Err(ImportError::InvalidEnumValue {
                    row: row.row_number,
                    field: "科类属性".to_string(),
                    value: supplied.to_string(),
                });
            }
        }
        Ok(())
    }

    fn student_exam_no_length(
        &self,
        row: &RawStudentRow,
        _scope: &StudentRowScope,
    ) -> ImportResult<()> {
        fixed_length(row.row_number, "考号", row.exam_no.as_deref(), EXAM_NO_LEN)
    }

    fn student_class_code_length(
        &self,
        row: &RawStudentRow,
        _scope: &StudentRowScope,
    ) -> ImportResult<()> {
        // 班级代码未提供时走派生，不在此检查
        match row.class_code.as_deref() {
            None => Ok(()),
            Some(code) => fixed_length(
                row.row_number,
                "班级代码",
                Some(code),
                self.class_code.class_code_len,
            ),
        }
    }

    // ==========================================
    // 教师规则实现
    // ==========================================

    fn teacher_school_matches(&self, row: &RawTeacherRow, ctx: &ImportContext) -> ImportResult<()> {
        ownership_match(
            row.row_number,
            "学校名称",
            &ctx.school_name,
            row.school_name.as_deref(),
        )
    }

    fn teacher_required_fields(&self, row: &RawTeacherRow, _ctx: &ImportContext) -> ImportResult<()> {
        require(row.row_number, "姓名", &row.name)?;
        require(row.row_number, "身份证号", &row.identity_no)?;
        Ok(())
    }

    fn teacher_subject_in_taxonomy(
        &self,
        row: &RawTeacherRow,
        _ctx: &ImportContext,
    ) -> ImportResult<()> {
        match row.subject.as_deref() {
            Some(raw) if TeacherSubject::parse(raw).is_some() => Ok(()),
            other => Err(ImportError::InvalidEnumValue {
                row: row.row_number,
                field: "任教学科".to_string(),
                value: other.unwrap_or("").to_string(),
            }),
        }
    }

    fn teacher_role_in_taxonomy(&self, row: &RawTeacherRow, _ctx: &ImportContext) -> ImportResult<()> {
        match row.role.as_deref() {
            Some(raw) if TeacherRole::parse(raw).is_some() => Ok(()),
            other => Err(ImportError::InvalidEnumValue {
                row: row.row_number,
                field: "角色".to_string(),
                value: other.unwrap_or("").to_string(),
            }),
        }
    }

    fn teacher_identity_valid(&self, row: &RawTeacherRow, _ctx: &ImportContext) -> ImportResult<()> {
        let raw = row.identity_no.as_deref().unwrap_or("");
        if parse_identity_number(raw).is_none() {
            return Err(ImportError::InvalidIdentityNumber { row: row.row_number });
        }
        Ok(())
    }

    // ==========================================
    // 班级代码派生
    // ==========================================
    // 规则: 学校代码左侧补零到固定宽度 + 考号固定切片，
    // 结果长度必须恰好等于班级代码定长，否则整批中止
    fn derive_class_code(
        &self,
        school_code: &str,
        exam_no: &str,
        row_number: usize,
    ) -> ImportResult<String> {
        let rule = &self.class_code;

        let padded = format!("{:0>width$}", school_code, width = rule.school_code_width);

        let slice_end = rule.exam_no_slice_start + rule.exam_no_slice_len;
        let digits: Vec<char> = exam_no.chars().collect();
        if digits.len() < slice_end {
            return Err(ImportError::DerivationFailure {
                row: row_number,
                reason: format!(
                    "考号长度不足以截取班级位 [{}..{})",
                    rule.exam_no_slice_start, slice_end
                ),
            });
        }
        let slice: String = digits[rule.exam_no_slice_start..slice_end].iter().collect();

        let derived = format!("{}{}", padded, slice);
        if derived.chars().count() != rule.class_code_len {
            return Err(ImportError::DerivationFailure {
                row: row_number,
                reason: format!(
                    "派生班级代码 {} 长度 {} ≠ {}",
                    derived,
                    derived.chars().count(),
                    rule.class_code_len
                ),
            });
        }
        Ok(derived)
    }
}

impl Default for RowRuleEngine {
    fn default() -> Self {
        Self::new(ClassCodeRule::default())
    }
}

// ==========================================
// 规则原语
// ==========================================

/// 归属匹配: 裁剪后精确相等，仅空白差异不算不匹配
fn ownership_match(
    row: usize,
    field: &str,
    expected: &str,
    actual: Option<&str>,
) -> ImportResult<()> {
    let actual = actual.unwrap_or("").trim();
    if actual != expected.trim() {
        return Err(ImportError::OwnershipMismatch {
            row,
            field: field.to_string(),
            expected: expected.trim().to_string(),
            actual: actual.to_string(),
        });
    }
    Ok(())
}

/// 必填字段（schema 已保证列存在，此处保证单元格非空）
fn require(row: usize, field: &str, value: &Option<String>) -> ImportResult<String> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(ImportError::MissingField {
            row,
            field: field.to_string(),
        }),
    }
}

/// 定长编码检查（按字符数，裁剪后）
fn fixed_length(row: usize, field: &str, value: Option<&str>, expected: usize) -> ImportResult<()> {
    let actual = value.unwrap_or("").trim().chars().count();
    if actual != expected {
        return Err(ImportError::InvalidLength {
            row,
            field: field.to_string(),
            expected,
            actual,
        });
    }
    Ok(())
}

fn trimmed(value: &Option<String>) -> String {
    value.as_deref().unwrap_or("").trim().to_string()
}

fn invalid_enum(row: usize, field: &str, value: &Option<String>) -> ImportError {
    ImportError::InvalidEnumValue {
        row,
        field: field.to_string(),
        value: value.clone().unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::Gender;

    fn ctx() -> ImportContext {
        ImportContext {
            username: "yz01".to_string(),
            is_admin: false,
            school_code: "5".to_string(),
            school_name: "一中".to_string(),
            cohort: "2027届".to_string(),
        }
    }

    fn student_row() -> RawStudentRow {
        RawStudentRow {
            school_code: Some("5".to_string()),
            school_name: Some("一中".to_string()),
            cohort: Some("2027届".to_string()),
            class_code: Some("501".to_string()),
            name: Some("张三".to_string()),
            student_id: Some("G440101001".to_string()),
            exam_track: Some("物化生".to_string()),
            exam_no: Some("1234567890".to_string()),
            subject_category: Some("物理类".to_string()),
            row_number: 1,
        }
    }

    fn teacher_row() -> RawTeacherRow {
        RawTeacherRow {
            school_name: Some("一中".to_string()),
            name: Some("王五".to_string()),
            identity_no: Some("11010519900307743X".to_string()),
            cohort: Some("2027届".to_string()),
            subject: Some("物理".to_string()),
            role: Some("任课教师".to_string()),
            row_number: 1,
        }
    }

    #[test]
    fn test_normalize_student_ok() {
        let engine = RowRuleEngine::default();
        let student = engine.normalize_student(&student_row(), &ctx(), false).unwrap();

        assert_eq!(student.exam_no, "1234567890");
        assert_eq!(student.class_code, "501");
        assert_eq!(student.exam_track, Some(ExamTrack::PhysChemBio));
        assert_eq!(student.subject_category, Some(SubjectCategory::Physics));
    }

    #[test]
    fn test_ownership_mismatch_on_school() {
        let engine = RowRuleEngine::default();
        let mut row = student_row();
        row.school_name = Some("二中".to_string());

        let err = engine.normalize_student(&row, &ctx(), false).unwrap_err();
        assert!(matches!(err, ImportError::OwnershipMismatch { ref field, .. } if field == "学校名称"));
    }

    #[test]
    fn test_ownership_tolerates_whitespace_only_difference() {
        let engine = RowRuleEngine::default();
        let mut row = student_row();
        row.school_name = Some("  一中  ".to_string());
        row.cohort = Some(" 2027届".to_string());

        assert!(engine.normalize_student(&row, &ctx(), false).is_ok());
    }

    #[test]
    fn test_ownership_mismatch_on_cohort() {
        let engine = RowRuleEngine::default();
        let mut row = student_row();
        row.cohort = Some("2026届".to_string());

        let err = engine.normalize_student(&row, &ctx(), false).unwrap_err();
        assert!(matches!(err, ImportError::OwnershipMismatch { ref field, .. } if field == "学届"));
    }

    #[test]
    fn test_invalid_exam_track_rejected() {
        let engine = RowRuleEngine::default();
        let mut row = student_row();
        row.exam_track = Some("物化史".to_string());
        row.subject_category = None;

        let err = engine.normalize_student(&row, &ctx(), false).unwrap_err();
        assert!(matches!(err, ImportError::InvalidEnumValue { ref field, .. } if field == "考生类型"));
    }

    #[test]
    fn test_category_inconsistent_with_track_rejected() {
        let engine = RowRuleEngine::default();
        let mut row = student_row();
        row.exam_track = Some("历政地".to_string());
        row.subject_category = Some("物理类".to_string());

        let err = engine.normalize_student(&row, &ctx(), false).unwrap_err();
        assert!(matches!(err, ImportError::InvalidEnumValue { ref field, .. } if field == "科类属性"));
    }

    #[test]
    fn test_absent_track_leaves_both_empty() {
        let engine = RowRuleEngine::default();
        let mut row = student_row();
        row.exam_track = None;
        row.subject_category = None;

        let student = engine.normalize_student(&row, &ctx(), false).unwrap();
        assert_eq!(student.exam_track, None);
        assert_eq!(student.subject_category, None);
    }

    #[test]
    fn test_not_yet_tracked_ignores_track_columns() {
        let engine = RowRuleEngine::default();
        let mut row = student_row();
        // 未分科导入: 即使列里有残留值也整体忽略
        row.exam_track = Some("物化史".to_string());
        row.subject_category = Some("不存在".to_string());

        let student = engine.normalize_student(&row, &ctx(), true).unwrap();
        assert_eq!(student.exam_track, None);
        assert_eq!(student.subject_category, None);
    }

    #[test]
    fn test_exam_no_length_exactly_ten() {
        let engine = RowRuleEngine::default();

        for (exam_no, ok) in [
            ("1234567890", true),
            ("123456789", false),
            ("12345678901", false),
        ] {
            let mut row = student_row();
            row.exam_no = Some(exam_no.to_string());
            let result = engine.normalize_student(&row, &ctx(), false);
            assert_eq!(result.is_ok(), ok, "exam_no = {}", exam_no);
            if !ok {
                assert!(matches!(
                    result.unwrap_err(),
                    ImportError::InvalidLength { ref field, expected: 10, .. } if field == "考号"
                ));
            }
        }
    }

    #[test]
    fn test_supplied_class_code_must_be_three_chars() {
        let engine = RowRuleEngine::default();
        let mut row = student_row();
        row.class_code = Some("5001".to_string());

        let err = engine.normalize_student(&row, &ctx(), false).unwrap_err();
        assert!(matches!(
            err,
            ImportError::InvalidLength { ref field, expected: 3, actual: 4, .. } if field == "班级代码"
        ));
    }

    #[test]
    fn test_class_code_derivation_default_rule() {
        let engine = RowRuleEngine::default();
        let mut row = student_row();
        row.class_code = None;

        // 学校代码 "5" + 考号 "1234567890"[2..4] = "34" → "534"
        let student = engine.normalize_student(&row, &ctx(), false).unwrap();
        assert_eq!(student.class_code, "534");
    }

    #[test]
    fn test_class_code_derivation_failure_on_bad_rule() {
        // 2 位学校代码宽度 + 2 位切片 = 4 位 ≠ 定长 3 → 派生失败
        let engine = RowRuleEngine::new(ClassCodeRule {
            school_code_width: 2,
            exam_no_slice_start: 2,
            exam_no_slice_len: 2,
            class_code_len: 3,
        });
        let mut row = student_row();
        row.class_code = None;

        let err = engine.normalize_student(&row, &ctx(), false).unwrap_err();
        assert!(matches!(err, ImportError::DerivationFailure { row: 1, .. }));
    }

    #[test]
    fn test_normalize_teacher_ok() {
        let engine = RowRuleEngine::default();
        let teacher = engine.normalize_teacher(&teacher_row(), &ctx()).unwrap();

        assert_eq!(teacher.identity_code, "11010519900307743X");
        assert_eq!(teacher.subject, TeacherSubject::Physics);
        assert_eq!(teacher.role, TeacherRole::SubjectTeacher);
        assert_eq!(teacher.gender, Some(Gender::Male));
        assert!(teacher.enabled);
        // 初始口令 = 身份证后 6 位
        assert_eq!(
            teacher.password_hash,
            hash_password("11010519900307743X", "07743X")
        );
    }

    #[test]
    fn test_teacher_invalid_identity_rejected() {
        let engine = RowRuleEngine::default();
        let mut row = teacher_row();
        row.identity_no = Some("1101051990030774".to_string()); // 16 位

        let err = engine.normalize_teacher(&row, &ctx()).unwrap_err();
        assert!(matches!(err, ImportError::InvalidIdentityNumber { row: 1 }));
    }

    #[test]
    fn test_teacher_invalid_subject_rejected() {
        let engine = RowRuleEngine::default();
        let mut row = teacher_row();
        row.subject = Some("体育".to_string());

        let err = engine.normalize_teacher(&row, &ctx()).unwrap_err();
        assert!(matches!(err, ImportError::InvalidEnumValue { ref field, .. } if field == "任教学科"));
    }

    #[test]
    fn test_teacher_invalid_role_rejected() {
        let engine = RowRuleEngine::default();
        let mut row = teacher_row();
        row.role = Some("班主任".to_string());

        let err = engine.normalize_teacher(&row, &ctx()).unwrap_err();
        assert!(matches!(err, ImportError::InvalidEnumValue { ref field, .. } if field == "角色"));
    }

    #[test]
    fn test_normalize_account_requires_school_fields() {
        let engine = RowRuleEngine::default();
        let row = RawAccountRow {
            username: Some("yz01".to_string()),
            password: Some("s3cret".to_string()),
            school_code: Some("5".to_string()),
            school_name: None,
            cohort: Some("2027届".to_string()),
            row_number: 2,
        };

        let err = engine.normalize_account(&row).unwrap_err();
        assert!(matches!(err, ImportError::MissingField { row: 2, ref field } if field == "学校简称"));
    }
}
