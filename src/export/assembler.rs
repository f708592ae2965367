// ==========================================
// 考务花名册管理系统 - 导出装配器
// ==========================================
// 职责: 从仓储读出花名册，装配为多 sheet 工作簿
// 口径:
// - 管理员导出全量，学校账号导出本校本届
// - 考生工作簿: 总表 + 按单科拆分的分科表（任一考生已分科时生成）
// - 导出列与导入表头同名，导出件可直接回灌导入
// ==========================================

use crate::domain::types::{ExamTrack, TeacherSubject};
use crate::domain::{ImportContext, Student, Teacher};
use crate::importer::error::ImportResult;
use crate::repository::{StudentRepository, TeacherRepository};
use tracing::info;

/// 考生导出文件名
pub const STUDENT_EXPORT_FILENAME: &str = "stu-list.xlsx";
/// 教师导出文件名
pub const TEACHER_EXPORT_FILENAME: &str = "teacher-list.xlsx";

/// 考生总表 sheet 名
pub const STUDENT_SHEET_NAME: &str = "考生名单";
/// 教师总表 sheet 名
pub const TEACHER_SHEET_NAME: &str = "教师名单";

/// 考生导出列（与导入表头一致）
const STUDENT_HEADERS: &[&str] = &[
    "学校代码",
    "学校名称",
    "学届",
    "班级代码",
    "姓名",
    "学籍号",
    "考生类型",
    "考号",
    "科类属性",
];

/// 教师导出列（与导入表头一致,附派生列）
const TEACHER_HEADERS: &[&str] = &[
    "学校名称",
    "姓名",
    "身份证号",
    "任教学届",
    "任教学科",
    "角色",
    "性别",
    "是否启用",
];

// ==========================================
// Sheet / Workbook - 导出中间结构
// ==========================================
#[derive(Debug, Clone)]
pub struct Sheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    fn new(name: &str, headers: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

// ==========================================
// ExportAssembler
// ==========================================
pub struct ExportAssembler<S, T>
where
    S: StudentRepository,
    T: TeacherRepository,
{
    student_repo: S,
    teacher_repo: T,
}

impl<S, T> ExportAssembler<S, T>
where
    S: StudentRepository,
    T: TeacherRepository,
{
    pub fn new(student_repo: S, teacher_repo: T) -> Self {
        Self {
            student_repo,
            teacher_repo,
        }
    }

    // ==========================================
    // 考生导出
    // ==========================================
    pub async fn export_students(&self, ctx: &ImportContext) -> ImportResult<Workbook> {
        let scope = if ctx.is_admin {
            None
        } else {
            Some((ctx.school_name.as_str(), ctx.cohort.as_str()))
        };
        let students = self.student_repo.list_by_scope(scope).await?;

        // 范围内无考生时导出只含表头的总表
        let mut primary = Sheet::new(STUDENT_SHEET_NAME, STUDENT_HEADERS);
        for student in &students {
            primary.rows.push(student_row(student));
        }

        let mut sheets = vec![primary];

        // 分科表: 仅当批内存在已分科考生时生成；
        // 每科一张，按选科组合的单科标记字符归组
        if students.iter().any(|s| s.exam_track.is_some()) {
            for subject in TeacherSubject::EXAM_SUBJECTS {
                let marker = subject.marker();
                let mut sheet = Sheet::new(subject.as_str(), STUDENT_HEADERS);
                for student in &students {
                    if let Some(track) = student.exam_track {
                        if track.subject_markers().contains(&marker) {
                            sheet.rows.push(student_row(student));
                        }
                    }
                }
                sheets.push(sheet);
            }
        }

        info!(
            operator = %ctx.username,
            students = students.len(),
            sheets = sheets.len(),
            "考生花名册导出装配完成"
        );
        Ok(Workbook { sheets })
    }

    // ==========================================
    // 教师导出
    // ==========================================
    pub async fn export_teachers(&self, ctx: &ImportContext) -> ImportResult<Workbook> {
        let scope = if ctx.is_admin {
            None
        } else {
            Some(ctx.school_name.as_str())
        };
        let teachers = self.teacher_repo.list_by_school(scope).await?;

        let mut sheet = Sheet::new(TEACHER_SHEET_NAME, TEACHER_HEADERS);
        for teacher in &teachers {
            sheet.rows.push(teacher_row(teacher));
        }

        info!(
            operator = %ctx.username,
            teachers = teachers.len(),
            "教师名单导出装配完成"
        );
        Ok(Workbook {
            sheets: vec![sheet],
        })
    }
}

fn student_row(student: &Student) -> Vec<String> {
    vec![
        student.school_code.clone(),
        student.school_name.clone(),
        student.cohort.clone(),
        student.class_code.clone(),
        student.name.clone(),
        student.student_id.clone().unwrap_or_default(),
        student
            .exam_track
            .map(|t| t.as_str().to_string())
            .unwrap_or_default(),
        student.exam_no.clone(),
        student
            .subject_category
            .map(|c| c.as_str().to_string())
            .unwrap_or_default(),
    ]
}

fn teacher_row(teacher: &Teacher) -> Vec<String> {
    vec![
        teacher.school_name.clone(),
        teacher.name.clone(),
        teacher.identity_code.clone(),
        teacher.cohort.clone().unwrap_or_default(),
        teacher.subject.as_str().to_string(),
        teacher.role.as_str().to_string(),
        teacher
            .gender
            .map(|g| g.as_str().to_string())
            .unwrap_or_default(),
        if teacher.enabled { "是" } else { "否" }.to_string(),
    ]
}

// 分科表用到组合的单科标记，这里集中做一次断言性的单元测试
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_student_row_order_matches_headers() {
        let student = Student {
            school_code: "5".to_string(),
            school_name: "一中".to_string(),
            cohort: "2027届".to_string(),
            class_code: "501".to_string(),
            name: "张三".to_string(),
            student_id: Some("G440101001".to_string()),
            exam_track: Some(ExamTrack::PhysChemBio),
            exam_no: "1234567890".to_string(),
            subject_category: Some(crate::domain::types::SubjectCategory::Physics),
        };
        let row = student_row(&student);
        assert_eq!(row.len(), STUDENT_HEADERS.len());
        assert_eq!(row[4], "张三");
        assert_eq!(row[6], "物化生");
        assert_eq!(row[8], "物理类");
    }

    #[test]
    fn test_untracked_student_exports_empty_track_cells() {
        let student = Student {
            school_code: "5".to_string(),
            school_name: "一中".to_string(),
            cohort: "2027届".to_string(),
            class_code: "501".to_string(),
            name: "李四".to_string(),
            student_id: None,
            exam_track: None,
            exam_no: "1234567891".to_string(),
            subject_category: None,
        };
        let row = student_row(&student);
        assert_eq!(row[6], "");
        assert_eq!(row[8], "");
    }
}
