// ==========================================
// 考务花名册管理系统 - 字段映射器实现
// ==========================================
// 职责: 列名 → 标准字段映射（含别名），空白单元格归一为 None
// 口径: 类型语义在此一次确定，下游规则引擎不再查列名
// ==========================================

use crate::domain::{RawAccountRow, RawStudentRow, RawTeacherRow};
use std::collections::HashMap;

pub struct FieldMapper;

impl FieldMapper {
    /// 考生行映射
    pub fn map_student(&self, row: &HashMap<String, String>, row_number: usize) -> RawStudentRow {
        RawStudentRow {
            school_code: self.get_string(row, "学校代码"),
            school_name: self.get_string(row, "学校名称"),
            cohort: self.get_string(row, "学届"),
            class_code: self.get_string(row, "班级代码"),
            name: self.get_string(row, "姓名"),
            student_id: self.get_string(row, "学籍号"),
            exam_track: self.get_string(row, "考生类型"),
            exam_no: self.get_string(row, "考号"),
            subject_category: self.get_string(row, "科类属性"),
            row_number,
        }
    }

    /// 教师行映射
    pub fn map_teacher(&self, row: &HashMap<String, String>, row_number: usize) -> RawTeacherRow {
        RawTeacherRow {
            school_name: self.get_string(row, "学校名称"),
            name: self.get_string(row, "姓名"),
            identity_no: self.get_string(row, "身份证号"),
            cohort: self.get_string(row, "任教学届"),
            subject: self.get_string(row, "任教学科"),
            role: self.get_string(row, "角色"),
            row_number,
        }
    }

    /// 账号行映射
    pub fn map_account(&self, row: &HashMap<String, String>, row_number: usize) -> RawAccountRow {
        RawAccountRow {
            username: self.get_string(row, "用户名"),
            password: self.get_string(row, "密码"),
            school_code: self.get_string(row, "学校代码"),
            school_name: self.get_string(row, "学校简称"),
            cohort: self.get_string(row, "学届"),
            row_number,
        }
    }

    /// 提取字符串字段（返回 Option），支持多个可能的列名（别名）
    fn get_string(&self, row: &HashMap<String, String>, key: &str) -> Option<String> {
        // 定义列名别名映射
        let aliases: &[&str] = match key {
            "学校名称" => &["学校名称", "学校简称", "单位"],
            "学校简称" => &["学校简称", "学校名称"],
            "学届" => &["学届", "年届"],
            "任教学届" => &["任教学届", "学届"],
            "身份证号" => &["身份证号", "身份证号码"],
            _ => return self.non_empty(row.get(key)),
        };

        // 尝试所有可能的列名
        for alias in aliases {
            if let Some(v) = self.non_empty(row.get(*alias)) {
                return Some(v);
            }
        }
        None
    }

    fn non_empty(&self, value: Option<&String>) -> Option<String> {
        value.and_then(|v| {
            let trimmed = v.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
    }
}
