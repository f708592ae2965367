// ==========================================
// 导出装配与回灌集成测试
// ==========================================
// 测试目标:
// - 导出工作簿: 总表 + 分科表的归组正确
// - 导出件写成 .xlsx 后可被重新导入（列名与导入表头一致）
// ==========================================

mod test_helpers;

use exam_roster::domain::ImportOptions;
use exam_roster::export::{
    write_workbook, ExportAssembler, STUDENT_SHEET_NAME, TEACHER_SHEET_NAME,
};
use exam_roster::logging;
use exam_roster::repository::{
    StudentRepository, StudentRepositoryImpl, TeacherRepositoryImpl,
};
use test_helpers::{
    admin_context, create_test_db, create_test_importer, school_context, write_csv,
    STUDENT_CSV_HEADER, TEACHER_CSV_HEADER,
};

fn make_assembler(
    conn: std::sync::Arc<std::sync::Mutex<rusqlite::Connection>>,
) -> ExportAssembler<StudentRepositoryImpl, TeacherRepositoryImpl> {
    ExportAssembler::new(
        StudentRepositoryImpl::new(conn.clone()),
        TeacherRepositoryImpl::new(conn),
    )
}

#[tokio::test]
async fn test_export_students_subject_sheets() {
    logging::init_test();
    let (dir, conn) = create_test_db();
    let importer = create_test_importer(conn.clone());
    let ctx = school_context();

    // 张三物化生，李四历政地，王五未分科
    let csv = format!(
        "{}\n5,一中,2027届,501,张三,G440101001,物化生,1234567890,物理类\n\
         5,一中,2027届,502,李四,G440101002,历政地,1234567891,历史类\n\
         5,一中,2027届,503,王五,G440101003,,1234567892,\n",
        STUDENT_CSV_HEADER
    );
    importer
        .import_students(
            &write_csv(dir.path(), "students.csv", &csv),
            &ctx,
            &ImportOptions::default(),
        )
        .await
        .unwrap();

    let workbook = make_assembler(conn).export_students(&ctx).await.unwrap();

    // 总表 + 6 张分科表
    assert_eq!(workbook.sheets.len(), 7);
    assert_eq!(workbook.sheets[0].name, STUDENT_SHEET_NAME);
    assert_eq!(workbook.sheets[0].rows.len(), 3);

    let sheet = |name: &str| {
        workbook
            .sheets
            .iter()
            .find(|s| s.name == name)
            .unwrap_or_else(|| panic!("missing sheet {}", name))
    };

    // 物理表只有张三；历史表只有李四；化学表只有张三；地理表只有李四
    let names = |sheet_name: &str| -> Vec<String> {
        sheet(sheet_name).rows.iter().map(|r| r[4].clone()).collect()
    };
    assert_eq!(names("物理"), vec!["张三"]);
    assert_eq!(names("化学"), vec!["张三"]);
    assert_eq!(names("生物"), vec!["张三"]);
    assert_eq!(names("历史"), vec!["李四"]);
    assert_eq!(names("政治"), vec!["李四"]);
    assert_eq!(names("地理"), vec!["李四"]);
}

#[tokio::test]
async fn test_export_all_untracked_has_single_sheet() {
    logging::init_test();
    let (dir, conn) = create_test_db();
    let importer = create_test_importer(conn.clone());
    let ctx = school_context();

    let csv = format!(
        "{}\n5,一中,2027届,501,张三,G440101001,,1234567890,\n",
        STUDENT_CSV_HEADER
    );
    importer
        .import_students(
            &write_csv(dir.path(), "students.csv", &csv),
            &ctx,
            &ImportOptions::default(),
        )
        .await
        .unwrap();

    // 无人分科时不生成分科表
    let workbook = make_assembler(conn).export_students(&ctx).await.unwrap();
    assert_eq!(workbook.sheets.len(), 1);
}

#[tokio::test]
async fn test_export_empty_scope_yields_header_only_sheet() {
    logging::init_test();
    let (_dir, conn) = create_test_db();
    let workbook = make_assembler(conn)
        .export_students(&school_context())
        .await
        .unwrap();
    assert_eq!(workbook.sheets.len(), 1);
    assert_eq!(workbook.sheets[0].name, STUDENT_SHEET_NAME);
    assert!(workbook.sheets[0].rows.is_empty());
}

#[tokio::test]
async fn test_export_scope_by_account() {
    logging::init_test();
    let (dir, conn) = create_test_db();
    let importer = create_test_importer(conn.clone());

    let own = format!(
        "{}\n5,一中,2027届,501,张三,G440101001,物化生,1234567890,物理类\n",
        STUDENT_CSV_HEADER
    );
    importer
        .import_students(
            &write_csv(dir.path(), "own.csv", &own),
            &school_context(),
            &ImportOptions::default(),
        )
        .await
        .unwrap();

    let other_ctx = exam_roster::ImportContext::from_account(
        &exam_roster::Account::school_account("yz02", "p4ss", "6", "二中", "2027届"),
    );
    let other = format!(
        "{}\n6,二中,2027届,601,赵六,G440102001,物化生,2234567890,物理类\n",
        STUDENT_CSV_HEADER
    );
    importer
        .import_students(
            &write_csv(dir.path(), "other.csv", &other),
            &other_ctx,
            &ImportOptions::default(),
        )
        .await
        .unwrap();

    let assembler = make_assembler(conn);

    // 学校账号只见本校；管理员见全量
    let school_view = assembler.export_students(&school_context()).await.unwrap();
    assert_eq!(school_view.sheets[0].rows.len(), 1);
    let admin_view = assembler.export_students(&admin_context()).await.unwrap();
    assert_eq!(admin_view.sheets[0].rows.len(), 2);
}

#[tokio::test]
async fn test_exported_xlsx_reimports_cleanly() {
    logging::init_test();
    let (dir, conn) = create_test_db();
    let importer = create_test_importer(conn.clone());
    let ctx = school_context();

    let csv = format!(
        "{}\n5,一中,2027届,501,张三,G440101001,物化生,1234567890,物理类\n\
         5,一中,2027届,502,李四,G440101002,历政地,1234567891,历史类\n",
        STUDENT_CSV_HEADER
    );
    importer
        .import_students(
            &write_csv(dir.path(), "students.csv", &csv),
            &ctx,
            &ImportOptions::default(),
        )
        .await
        .unwrap();

    // 导出 → 序列化为 .xlsx → 替换式回灌
    let workbook = make_assembler(conn.clone()).export_students(&ctx).await.unwrap();
    let bytes = write_workbook(&workbook).unwrap();
    let xlsx_path = dir.path().join("stu-list.xlsx");
    std::fs::write(&xlsx_path, bytes).unwrap();

    let options = ImportOptions {
        replace: true,
        not_yet_tracked: false,
    };
    let summary = importer
        .import_students(&xlsx_path, &ctx, &options)
        .await
        .expect("re-import of exported workbook should succeed");
    assert_eq!(summary.inserted, 2);

    let repo = StudentRepositoryImpl::new(conn);
    let students = repo.list_by_scope(Some(("一中", "2027届"))).await.unwrap();
    let exam_nos: Vec<&str> = students.iter().map(|s| s.exam_no.as_str()).collect();
    assert_eq!(exam_nos, vec!["1234567890", "1234567891"]);
    assert_eq!(students[0].exam_track, Some(exam_roster::ExamTrack::PhysChemBio));
}

#[tokio::test]
async fn test_export_teachers_workbook() {
    logging::init_test();
    let (dir, conn) = create_test_db();
    let importer = create_test_importer(conn.clone());
    let ctx = school_context();

    let csv = format!(
        "{}\n一中,王五,11010519900307743X,2027届,物理,任课教师\n",
        TEACHER_CSV_HEADER
    );
    importer
        .import_teachers(
            &write_csv(dir.path(), "teachers.csv", &csv),
            &ctx,
            &ImportOptions::default(),
        )
        .await
        .unwrap();

    let workbook = make_assembler(conn).export_teachers(&ctx).await.unwrap();
    assert_eq!(workbook.sheets.len(), 1);
    assert_eq!(workbook.sheets[0].name, TEACHER_SHEET_NAME);
    let row = &workbook.sheets[0].rows[0];
    assert_eq!(row[1], "王五");
    assert_eq!(row[6], "男");
    assert_eq!(row[7], "是");
}
