use diesel::prelude::*;

use storefront::schema::{brands, categories, products};

mod common;

#[test]
fn test_db_fixture_migrates_seeds_and_cleans_up() {
    let path;

    {
        let test_db = common::TestDb::new("fixture_lifecycle");
        path = test_db.path().to_path_buf();
        assert!(path.exists());

        let mut conn = test_db.pool().get().expect("pool yields a connection");

        // Migrations created the catalog tables and seeded the reference data.
        let brand_count: i64 = brands::table.count().get_result(&mut conn).unwrap();
        assert!(brand_count > 0);
        let category_count: i64 = categories::table.count().get_result(&mut conn).unwrap();
        assert!(category_count > 0);
        let product_count: i64 = products::table.count().get_result(&mut conn).unwrap();
        assert_eq!(product_count, 0);
    }

    assert!(!path.exists());
    let base = path.display();
    assert!(!std::path::Path::new(&format!("{base}-shm")).exists());
    assert!(!std::path::Path::new(&format!("{base}-wal")).exists());
}
