// ==========================================
// 考务花名册管理系统 - 领域类型定义
// ==========================================
// 固定口径:
// - 考生类型（选科组合）= 首选科目(物/历) × 再选两科，共 12 种
// - 科类属性 = 物理类 / 历史类，由考生类型首字符派生
// - 教师学科 = 高考 9 学科
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 考生类型 (Exam Track)
// ==========================================
// 红线: 枚举封闭，导入时只接受这 12 种中文串
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExamTrack {
    PhysChemBio, // 物化生
    PhysChemPol, // 物化政
    PhysChemGeo, // 物化地
    PhysBioGeo,  // 物生地
    PhysBioPol,  // 物生政
    PhysGeoPol,  // 物地政
    HistChemPol, // 历化政
    HistChemBio, // 历化生
    HistChemGeo, // 历化地
    HistBioPol,  // 历生政
    HistBioGeo,  // 历生地
    HistPolGeo,  // 历政地
}

impl ExamTrack {
    /// 全部 12 种组合
    pub const ALL: [ExamTrack; 12] = [
        ExamTrack::PhysChemBio,
        ExamTrack::PhysChemPol,
        ExamTrack::PhysChemGeo,
        ExamTrack::PhysBioGeo,
        ExamTrack::PhysBioPol,
        ExamTrack::PhysGeoPol,
        ExamTrack::HistChemPol,
        ExamTrack::HistChemBio,
        ExamTrack::HistChemGeo,
        ExamTrack::HistBioPol,
        ExamTrack::HistBioGeo,
        ExamTrack::HistPolGeo,
    ];

    /// 中文串形式（与上传表格/数据库存储一致）
    pub fn as_str(&self) -> &'static str {
        match self {
            ExamTrack::PhysChemBio => "物化生",
            ExamTrack::PhysChemPol => "物化政",
            ExamTrack::PhysChemGeo => "物化地",
            ExamTrack::PhysBioGeo => "物生地",
            ExamTrack::PhysBioPol => "物生政",
            ExamTrack::PhysGeoPol => "物地政",
            ExamTrack::HistChemPol => "历化政",
            ExamTrack::HistChemBio => "历化生",
            ExamTrack::HistChemGeo => "历化地",
            ExamTrack::HistBioPol => "历生政",
            ExamTrack::HistBioGeo => "历生地",
            ExamTrack::HistPolGeo => "历政地",
        }
    }

    /// 从中文串解析；非封闭集合成员返回 None
    pub fn parse(raw: &str) -> Option<ExamTrack> {
        Self::ALL.iter().copied().find(|t| t.as_str() == raw)
    }

    /// 科类属性（由首字符派生: 物 → 物理类, 历 → 历史类）
    pub fn category(&self) -> SubjectCategory {
        match self.as_str().chars().next() {
            Some('物') => SubjectCategory::Physics,
            _ => SubjectCategory::History,
        }
    }

    /// 组合中的三个学科标记字符（物/历/化/生/政/地）
    pub fn subject_markers(&self) -> [char; 3] {
        let mut chars = self.as_str().chars();
        [
            chars.next().unwrap_or(' '),
            chars.next().unwrap_or(' '),
            chars.next().unwrap_or(' '),
        ]
    }
}

impl fmt::Display for ExamTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 科类属性 (Subject Category)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubjectCategory {
    Physics, // 物理类
    History, // 历史类
}

impl SubjectCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubjectCategory::Physics => "物理类",
            SubjectCategory::History => "历史类",
        }
    }

    pub fn parse(raw: &str) -> Option<SubjectCategory> {
        match raw {
            "物理类" => Some(SubjectCategory::Physics),
            "历史类" => Some(SubjectCategory::History),
            _ => None,
        }
    }
}

impl fmt::Display for SubjectCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 教师任教学科 (Teacher Subject)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeacherSubject {
    Chinese,   // 语文
    Math,      // 数学
    English,   // 英语
    Physics,   // 物理
    History,   // 历史
    Chemistry, // 化学
    Biology,   // 生物
    Politics,  // 政治
    Geography, // 地理
}

impl TeacherSubject {
    pub const ALL: [TeacherSubject; 9] = [
        TeacherSubject::Chinese,
        TeacherSubject::Math,
        TeacherSubject::English,
        TeacherSubject::Physics,
        TeacherSubject::History,
        TeacherSubject::Chemistry,
        TeacherSubject::Biology,
        TeacherSubject::Politics,
        TeacherSubject::Geography,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TeacherSubject::Chinese => "语文",
            TeacherSubject::Math => "数学",
            TeacherSubject::English => "英语",
            TeacherSubject::Physics => "物理",
            TeacherSubject::History => "历史",
            TeacherSubject::Chemistry => "化学",
            TeacherSubject::Biology => "生物",
            TeacherSubject::Politics => "政治",
            TeacherSubject::Geography => "地理",
        }
    }

    pub fn parse(raw: &str) -> Option<TeacherSubject> {
        Self::ALL.iter().copied().find(|s| s.as_str() == raw)
    }

    /// 选科拆分涉及的 6 个学科（语数英为公共科目，不拆分）
    pub const EXAM_SUBJECTS: [TeacherSubject; 6] = [
        TeacherSubject::Physics,
        TeacherSubject::History,
        TeacherSubject::Chemistry,
        TeacherSubject::Biology,
        TeacherSubject::Politics,
        TeacherSubject::Geography,
    ];

    /// 选科组合中代表本学科的标记字符（物/历/化/生/政/地）
    ///
    /// 公共科目没有标记字符，返回空格，永远不会命中任何组合
    pub fn marker(&self) -> char {
        match self {
            TeacherSubject::Physics => '物',
            TeacherSubject::History => '历',
            TeacherSubject::Chemistry => '化',
            TeacherSubject::Biology => '生',
            TeacherSubject::Politics => '政',
            TeacherSubject::Geography => '地',
            _ => ' ',
        }
    }
}

impl fmt::Display for TeacherSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 教师角色 (Teacher Role)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeacherRole {
    SubjectTeacher, // 任课教师
    DepartmentHead, // 科组长
}

impl TeacherRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            TeacherRole::SubjectTeacher => "任课教师",
            TeacherRole::DepartmentHead => "科组长",
        }
    }

    pub fn parse(raw: &str) -> Option<TeacherRole> {
        match raw {
            "任课教师" => Some(TeacherRole::SubjectTeacher),
            "科组长" => Some(TeacherRole::DepartmentHead),
            _ => None,
        }
    }
}

impl fmt::Display for TeacherRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 性别 (Gender)
// ==========================================
// 身份证导入路径下由校验位前一位的奇偶派生
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,   // 男
    Female, // 女
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "男",
            Gender::Female => "女",
        }
    }

    pub fn parse(raw: &str) -> Option<Gender> {
        match raw {
            "男" => Some(Gender::Male),
            "女" => Some(Gender::Female),
            _ => None,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 导入种类 (Import Kind)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImportKind {
    Students, // 考生名单
    Teachers, // 监考/任课教师名单
    Accounts, // 学校账号名单
}

impl fmt::Display for ImportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportKind::Students => write!(f, "STUDENTS"),
            ImportKind::Teachers => write!(f, "TEACHERS"),
            ImportKind::Accounts => write!(f, "ACCOUNTS"),
        }
    }
}
