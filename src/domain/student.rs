// ==========================================
// 考务花名册管理系统 - 考生领域模型
// ==========================================
// 口径:
// - 考号固定 10 位，全局唯一（跨学校）
// - 班级代码固定 3 位，可由学校代码 + 考号切片派生
// - 考生类型/科类属性允许为空（高一未分科），两者同在时必须一致
// ==========================================

use crate::domain::types::{ExamTrack, SubjectCategory};
use serde::{Deserialize, Serialize};

// ==========================================
// Student - 考生
// ==========================================
// 用途: 导入管道写入，导出装配只读
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub school_code: String,                        // 学校代码
    pub school_name: String,                        // 学校名称
    pub cohort: String,                             // 学届
    pub class_code: String,                         // 班级代码（3 位）
    pub name: String,                               // 姓名
    pub student_id: Option<String>,                 // 学籍号
    pub exam_track: Option<ExamTrack>,              // 考生类型（选科组合）
    pub exam_no: String,                            // 考号（自然键，10 位）
    pub subject_category: Option<SubjectCategory>,  // 科类属性（由考生类型派生）
}

// ==========================================
// RawStudentRow - 导入中间结构体
// ==========================================
// 用途: 字段映射输出（列名 → 已裁剪字符串，一次成型）
// 生命周期: 仅在导入流程内
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawStudentRow {
    pub school_code: Option<String>,
    pub school_name: Option<String>,
    pub cohort: Option<String>,
    pub class_code: Option<String>,
    pub name: Option<String>,
    pub student_id: Option<String>,
    pub exam_track: Option<String>,
    pub exam_no: Option<String>,
    pub subject_category: Option<String>,

    // 元信息: 数据行号（1 基，用于错误定位）
    pub row_number: usize,
}
