//! PostgreSQL adapter for PageRepository
//!
//! A page is stored as one `pages` row plus its `page_contacts` and
//! `page_facts` rows. Saves replace the child rows inside the same
//! transaction as the version check.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, Order, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr,
    TransactionTrait,
};
use uuid::Uuid;

use crate::domain::entities::{
    Contact, ContactId, Fact, FactId, Page, PageId, PageRecord, PageState, QuestionId,
};
use crate::domain::ports::{PageRepository, PageSearch, PageSearchResult, SortOrder};
use crate::entity::{page_contacts, page_facts, pages};
use crate::error::DomainError;

/// PostgreSQL implementation of PageRepository
pub struct PostgresPageRepository {
    db: DatabaseConnection,
}

impl PostgresPageRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_one(&self, condition: Condition) -> Result<Option<Page>, DomainError> {
        let model = pages::Entity::find()
            .filter(condition)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        match model {
            Some(model) => Ok(self.hydrate(vec![model]).await?.pop()),
            None => Ok(None),
        }
    }

    /// Load contacts and facts for a batch of page rows
    async fn hydrate(&self, models: Vec<pages::Model>) -> Result<Vec<Page>, DomainError> {
        if models.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();

        let mut contacts: HashMap<Uuid, Vec<Contact>> = HashMap::new();
        for row in page_contacts::Entity::find()
            .filter(page_contacts::Column::PageId.is_in(ids.clone()))
            .order_by_asc(page_contacts::Column::Position)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?
        {
            contacts.entry(row.page_id).or_default().push(Contact {
                id: ContactId(row.id),
                content: row.content,
            });
        }

        let mut facts: HashMap<Uuid, Vec<Fact>> = HashMap::new();
        for row in page_facts::Entity::find()
            .filter(page_facts::Column::PageId.is_in(ids))
            .order_by_asc(page_facts::Column::Position)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?
        {
            facts.entry(row.page_id).or_default().push(Fact {
                id: FactId(row.id),
                title: row.title,
                content: row.content,
                image_url: row.image_url,
                question_id: row.question_id.map(QuestionId),
            });
        }

        models
            .into_iter()
            .map(|model| {
                let state: PageState = model.state.parse().map_err(DomainError::Internal)?;
                Ok(Page::from(PageRecord {
                    id: PageId(model.id),
                    contacts: contacts.remove(&model.id).unwrap_or_default(),
                    facts: facts.remove(&model.id).unwrap_or_default(),
                    route: model.route,
                    display_name: model.display_name,
                    user_id: model.user_id,
                    avatar_image_url: model.avatar_image_url,
                    reference_image_url: model.reference_image_url,
                    state,
                    version: model.version,
                    created_at: model.created_at.with_timezone(&Utc),
                    updated_at: model.updated_at.with_timezone(&Utc),
                }))
            })
            .collect()
    }
}

fn map_write_error(e: DbErr) -> DomainError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) => DomainError::AlreadyExists(msg),
        _ => DomainError::Database(e.to_string()),
    }
}

/// Case-insensitive `LIKE` pattern matching `term` anywhere, with `\`, `%`
/// and `_` taken literally
fn contains_pattern(term: &str) -> String {
    let mut pattern = String::from("%");
    for c in term.trim().to_lowercase().chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Insert the contact and fact rows of a page
async fn insert_children<C: ConnectionTrait>(
    conn: &C,
    record: &PageRecord,
) -> Result<(), DomainError> {
    if !record.contacts.is_empty() {
        let rows = record
            .contacts
            .iter()
            .enumerate()
            .map(|(i, c)| page_contacts::ActiveModel {
                id: Set(c.id.0),
                page_id: Set(record.id.0),
                content: Set(c.content.clone()),
                position: Set(i as i32),
            });
        page_contacts::Entity::insert_many(rows)
            .exec(conn)
            .await
            .map_err(map_write_error)?;
    }

    if !record.facts.is_empty() {
        let rows = record
            .facts
            .iter()
            .enumerate()
            .map(|(i, f)| page_facts::ActiveModel {
                id: Set(f.id.0),
                page_id: Set(record.id.0),
                title: Set(f.title.clone()),
                content: Set(f.content.clone()),
                image_url: Set(f.image_url.clone()),
                question_id: Set(f.question_id.map(|q| q.0)),
                position: Set(i as i32),
            });
        page_facts::Entity::insert_many(rows)
            .exec(conn)
            .await
            .map_err(map_write_error)?;
    }

    Ok(())
}

#[async_trait]
impl PageRepository for PostgresPageRepository {
    async fn find_by_id(&self, id: &PageId) -> Result<Option<Page>, DomainError> {
        self.find_one(Condition::all().add(pages::Column::Id.eq(id.0)))
            .await
    }

    async fn find_by_user_id(&self, user_id: &str) -> Result<Option<Page>, DomainError> {
        self.find_one(Condition::all().add(pages::Column::UserId.eq(user_id)))
            .await
    }

    async fn find_by_route(&self, route: &str) -> Result<Option<Page>, DomainError> {
        self.find_one(Condition::all().add(pages::Column::Route.eq(route)))
            .await
    }

    async fn find_by_fact_id(&self, fact_id: &FactId) -> Result<Option<Page>, DomainError> {
        let fact = page_facts::Entity::find_by_id(fact_id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        match fact {
            Some(fact) => self.find_by_id(&PageId(fact.page_id)).await,
            None => Ok(None),
        }
    }

    async fn find_by_contact_id(
        &self,
        contact_id: &ContactId,
    ) -> Result<Option<Page>, DomainError> {
        let contact = page_contacts::Entity::find_by_id(contact_id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        match contact {
            Some(contact) => self.find_by_id(&PageId(contact.page_id)).await,
            None => Ok(None),
        }
    }

    async fn is_route_in_use(
        &self,
        route: &str,
        excluding: Option<&PageId>,
    ) -> Result<bool, DomainError> {
        let mut query = pages::Entity::find().filter(pages::Column::Route.eq(route));
        if let Some(id) = excluding {
            query = query.filter(pages::Column::Id.ne(id.0));
        }

        let count = query
            .count(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(count > 0)
    }

    async fn create(&self, page: &Page) -> Result<(), DomainError> {
        let record = page.to_record();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        pages::ActiveModel {
            id: Set(record.id.0),
            route: Set(record.route.clone()),
            display_name: Set(record.display_name.clone()),
            user_id: Set(record.user_id.clone()),
            avatar_image_url: Set(record.avatar_image_url.clone()),
            reference_image_url: Set(record.reference_image_url.clone()),
            state: Set(record.state.to_string()),
            version: Set(record.version),
            created_at: Set(record.created_at.fixed_offset()),
            updated_at: Set(record.updated_at.fixed_offset()),
        }
        .insert(&txn)
        .await
        .map_err(map_write_error)?;

        insert_children(&txn, &record).await?;

        txn.commit()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))
    }

    async fn concurrency_safe_update(
        &self,
        page: &Page,
        loaded_version: i64,
    ) -> Result<i64, DomainError> {
        let record = page.to_record();
        let new_version = loaded_version + 1;
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        let result = pages::Entity::update_many()
            .col_expr(pages::Column::Route, Expr::value(record.route.clone()))
            .col_expr(
                pages::Column::DisplayName,
                Expr::value(record.display_name.clone()),
            )
            .col_expr(
                pages::Column::AvatarImageUrl,
                Expr::value(record.avatar_image_url.clone()),
            )
            .col_expr(
                pages::Column::ReferenceImageUrl,
                Expr::value(record.reference_image_url.clone()),
            )
            .col_expr(pages::Column::State, Expr::value(record.state.to_string()))
            .col_expr(
                pages::Column::UpdatedAt,
                Expr::value(record.updated_at.fixed_offset()),
            )
            .col_expr(pages::Column::Version, Expr::value(new_version))
            .filter(pages::Column::Id.eq(record.id.0))
            .filter(pages::Column::Version.eq(loaded_version))
            .exec(&txn)
            .await
            .map_err(map_write_error)?;

        if result.rows_affected == 0 {
            txn.rollback()
                .await
                .map_err(|e| DomainError::Database(e.to_string()))?;
            return Err(DomainError::Conflict(format!(
                "Page {} was modified concurrently (expected version {})",
                record.id, loaded_version
            )));
        }

        page_contacts::Entity::delete_many()
            .filter(page_contacts::Column::PageId.eq(record.id.0))
            .exec(&txn)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;
        page_facts::Entity::delete_many()
            .filter(page_facts::Column::PageId.eq(record.id.0))
            .exec(&txn)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        insert_children(&txn, &record).await?;

        txn.commit()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(new_version)
    }

    async fn search(&self, search: &PageSearch) -> Result<PageSearchResult, DomainError> {
        let mut query = pages::Entity::find();

        if let Some(term) = search.term.as_deref().filter(|t| !t.trim().is_empty()) {
            let pattern = contains_pattern(term);
            query = query.filter(
                Condition::any()
                    .add(
                        Expr::expr(Func::lower(Expr::col(pages::Column::Route)))
                            .like(LikeExpr::new(pattern.clone()).escape('\\')),
                    )
                    .add(
                        Expr::expr(Func::lower(Expr::col(pages::Column::DisplayName)))
                            .like(LikeExpr::new(pattern).escape('\\')),
                    ),
            );
        }
        if let Some(from) = search.from {
            query = query.filter(pages::Column::CreatedAt.gte(from.fixed_offset()));
        }
        if let Some(to) = search.to {
            query = query.filter(pages::Column::CreatedAt.lte(to.fixed_offset()));
        }

        let total_count = query
            .clone()
            .count(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        let order = match search.sort_order {
            SortOrder::Asc => Order::Asc,
            SortOrder::Desc => Order::Desc,
        };
        let models = query
            .order_by(pages::Column::CreatedAt, order)
            .offset(search.offset())
            .limit(search.records_per_page)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(PageSearchResult {
            items: self.hydrate(models).await?,
            total_count,
        })
    }
}
