use chrono::{DateTime, TimeZone, Utc};
use docrepo::common::{Convertible, Document, Value};
use docrepo::errors::RepoResult;
use docrepo::filter::Criteria;
use docrepo::index::IndexSpec;
use docrepo::repository::{Model, Repository};
use docrepo::store::MemoryStore;

/// Creates a repository over a fresh in-memory store.
pub fn create_repository() -> Repository {
    Repository::new(MemoryStore::open())
}

/// Test fixture persisted in the `users` collection, unique by `user_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub age: i64,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(user_id: i64, name: &str, age: i64) -> User {
        User {
            user_id,
            name: name.to_string(),
            email: format!("{}@example.com", name),
            age,
            active: true,
            created_at: Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    pub fn created_at(mut self, created_at: DateTime<Utc>) -> User {
        self.created_at = created_at;
        self
    }
}

impl Convertible for User {
    type Output = User;

    fn to_value(&self) -> RepoResult<Value> {
        let mut doc = Document::new();
        doc.put("user_id", self.user_id);
        doc.put("name", self.name.clone());
        doc.put("email", self.email.clone());
        doc.put("age", self.age);
        doc.put("active", self.active);
        doc.put("created_at", self.created_at);
        Ok(Value::Document(doc))
    }

    fn from_value(value: &Value) -> RepoResult<User> {
        let doc = value.as_document().ok_or("Value is not a document")?;
        Ok(User {
            user_id: i64::from_value(doc.get("user_id").unwrap_or(&Value::Null))?,
            name: String::from_value(doc.get("name").unwrap_or(&Value::Null))?,
            email: String::from_value(doc.get("email").unwrap_or(&Value::Null))?,
            age: i64::from_value(doc.get("age").unwrap_or(&Value::Null))?,
            active: bool::from_value(doc.get("active").unwrap_or(&Value::Null))?,
            created_at: <DateTime<Utc>>::from_value(doc.get("created_at").unwrap_or(&Value::Null))?,
        })
    }
}

impl Model for User {
    fn collection_name(&self) -> String {
        "users".to_string()
    }

    fn unique_criteria(&self) -> Criteria {
        let mut doc = Document::new();
        doc.put("user_id", self.user_id);
        Criteria::from_document(doc)
    }

    fn indexes(&self) -> Vec<IndexSpec> {
        vec![
            IndexSpec::new(vec!["user_id"]).unique(),
            IndexSpec::new(vec!["email"]).unique().sparse(),
            IndexSpec::new(vec!["-created_at"]),
        ]
    }
}

/// Inserts `count` users with ages `20, 21, ...` and yearly creation dates
/// starting at 2020.
pub fn seed_users(repository: &Repository, count: i64) -> RepoResult<Vec<User>> {
    let mut users = Vec::with_capacity(count as usize);
    for i in 0..count {
        let created = Utc
            .with_ymd_and_hms(2020 + i as i32, 1, 1, 0, 0, 0)
            .unwrap();
        let user = User::new(i, &format!("user{}", i), 20 + i).created_at(created);
        repository.insert(&user)?;
        users.push(user);
    }
    Ok(users)
}
