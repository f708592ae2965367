// ==========================================
// 替换式导入语义集成测试
// ==========================================
// 测试目标:
// - 替换式导入先清空范围，清空先于行校验提交（不回滚）
// - 追加式导入跨范围撞考号时整批回滚，报存储约束冲突
// - 账号替换只清非管理员账号
// ==========================================

mod test_helpers;

use exam_roster::domain::{Account, ImportContext, ImportOptions};
use exam_roster::importer::ImportError;
use exam_roster::logging;
use exam_roster::repository::{
    AccountRepository, AccountRepositoryImpl, StudentRepository, StudentRepositoryImpl,
};
use test_helpers::{
    admin_context, create_test_db, create_test_importer, school_context, write_csv,
    ACCOUNT_CSV_HEADER, STUDENT_CSV_HEADER,
};

const REPLACE: ImportOptions = ImportOptions {
    replace: true,
    not_yet_tracked: false,
};

#[tokio::test]
async fn test_replace_clears_scope_then_inserts() {
    logging::init_test();
    let (dir, conn) = create_test_db();
    let importer = create_test_importer(conn.clone());
    let ctx = school_context();

    let first = format!(
        "{}\n5,一中,2027届,501,张三,G440101001,物化生,1234567890,物理类\n",
        STUDENT_CSV_HEADER
    );
    importer
        .import_students(
            &write_csv(dir.path(), "first.csv", &first),
            &ctx,
            &ImportOptions::default(),
        )
        .await
        .unwrap();

    // 替换式二次导入: 旧记录应被清掉，只剩新批次
    let second = format!(
        "{}\n5,一中,2027届,502,李四,G440101002,历政地,1234567891,历史类\n",
        STUDENT_CSV_HEADER
    );
    let summary = importer
        .import_students(&write_csv(dir.path(), "second.csv", &second), &ctx, &REPLACE)
        .await
        .unwrap();
    assert!(summary.replaced_scope);

    let repo = StudentRepositoryImpl::new(conn);
    let students = repo.list_by_scope(Some(("一中", "2027届"))).await.unwrap();
    assert_eq!(students.len(), 1);
    assert_eq!(students[0].exam_no, "1234567891");
}

#[tokio::test]
async fn test_replace_scope_is_school_and_cohort() {
    logging::init_test();
    let (dir, conn) = create_test_db();
    let importer = create_test_importer(conn.clone());

    // 先以二中账号导入一批
    let other_ctx = ImportContext::from_account(&Account::school_account(
        "yz02", "p4ss", "6", "二中", "2027届",
    ));
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

    // 一中替换式导入不得波及二中
    let own = format!(
        "{}\n5,一中,2027届,501,张三,G440101001,物化生,1234567890,物理类\n",
        STUDENT_CSV_HEADER
    );
    importer
        .import_students(
            &write_csv(dir.path(), "own.csv", &own),
            &school_context(),
            &REPLACE,
        )
        .await
        .unwrap();

    let repo = StudentRepositoryImpl::new(conn);
    assert_eq!(
        repo.list_by_scope(Some(("二中", "2027届"))).await.unwrap().len(),
        1
    );
}

#[tokio::test]
async fn test_replace_delete_survives_failed_row_validation() {
    logging::init_test();
    let (dir, conn) = create_test_db();
    let importer = create_test_importer(conn.clone());
    let ctx = school_context();

    let first = format!(
        "{}\n5,一中,2027届,501,张三,G440101001,物化生,1234567890,物理类\n",
        STUDENT_CSV_HEADER
    );
    importer
        .import_students(
            &write_csv(dir.path(), "first.csv", &first),
            &ctx,
            &ImportOptions::default(),
        )
        .await
        .unwrap();

    // 替换批第 2 行考号非法 → 整批中止；
    // 但清空步骤已独立提交，范围内旧记录不恢复（既定行为）
    let bad = format!(
        "{}\n5,一中,2027届,501,李四,G440101002,物化生,1234567891,物理类\n\
         5,一中,2027届,501,王五,G440101003,物化生,12345,物理类\n",
        STUDENT_CSV_HEADER
    );
    let err = importer
        .import_students(&write_csv(dir.path(), "bad.csv", &bad), &ctx, &REPLACE)
        .await
        .unwrap_err();
    assert!(matches!(err, ImportError::InvalidLength { row: 2, .. }));

    let repo = StudentRepositoryImpl::new(conn);
    assert!(repo
        .list_by_scope(Some(("一中", "2027届")))
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_append_cross_scope_exam_no_conflict_rolls_back() {
    logging::init_test();
    let (dir, conn) = create_test_db();
    let importer = create_test_importer(conn.clone());

    // 二中先占用考号 2234567890
    let other_ctx = ImportContext::from_account(&Account::school_account(
        "yz02", "p4ss", "6", "二中", "2027届",
    ));
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

    // 一中追加批第 2 行撞考号 → 存储约束冲突，整批回滚
    let own = format!(
        "{}\n5,一中,2027届,501,张三,G440101001,物化生,1234567890,物理类\n\
         5,一中,2027届,501,李四,G440101002,物化生,2234567890,物理类\n",
        STUDENT_CSV_HEADER
    );
    let err = importer
        .import_students(
            &write_csv(dir.path(), "own.csv", &own),
            &school_context(),
            &ImportOptions::default(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ImportError::StorageConstraintViolation { .. }));

    let repo = StudentRepositoryImpl::new(conn);
    assert!(repo
        .list_by_scope(Some(("一中", "2027届")))
        .await
        .unwrap()
        .is_empty());
    assert_eq!(
        repo.list_by_scope(Some(("二中", "2027届"))).await.unwrap().len(),
        1
    );
}

#[tokio::test]
async fn test_account_replace_spares_admin() {
    logging::init_test();
    let (dir, conn) = create_test_db();
    let importer = create_test_importer(conn.clone());

    let account_repo = AccountRepositoryImpl::new(conn.clone());
    account_repo
        .upsert_admin(&Account::admin_account("admin", "changeme"))
        .await
        .unwrap();

    let first = format!("{}\nyz01,s3cret,5,一中,2027届\n", ACCOUNT_CSV_HEADER);
    importer
        .import_accounts(
            &write_csv(dir.path(), "first.csv", &first),
            &admin_context(),
            &ImportOptions::default(),
        )
        .await
        .unwrap();

    let second = format!("{}\nyz02,p4ss,6,二中,2027届\n", ACCOUNT_CSV_HEADER);
    importer
        .import_accounts(
            &write_csv(dir.path(), "second.csv", &second),
            &admin_context(),
            &REPLACE,
        )
        .await
        .unwrap();

    let accounts = account_repo.list_all().await.unwrap();
    let usernames: Vec<&str> = accounts.iter().map(|a| a.username.as_str()).collect();
    assert_eq!(usernames, vec!["admin", "yz02"]);
}
