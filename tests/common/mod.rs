use sea_orm::{Database, DatabaseConnection};

use upsert_connect_or_create::schema;

pub struct TestContext {
    pub db: DatabaseConnection,
}

impl TestContext {
    pub async fn new(test_name: &str) -> Self {
        let db = Database::connect("sqlite::memory:")
            .await
            .unwrap_or_else(|err| panic!("failed to connect for {test_name}: {err}"));

        schema::create_tables(&db)
            .await
            .expect("failed to create tables");

        Self { db }
    }

    pub async fn delete(self) {
        self.db.close().await.expect("failed to close connection");
    }
}
