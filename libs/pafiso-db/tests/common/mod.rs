#![allow(dead_code)]

use std::sync::Arc;

use once_cell::sync::Lazy;
use pafiso_core::{EnumDescriptor, EnumVariant, FieldDef, FieldKind, FieldValue, Queryable, Schema};
use pafiso_db::FieldMap;
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveValue, ConnectOptions, ConnectionTrait, Database, DatabaseConnection, EntityTrait};

pub mod supplier {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "suppliers")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: i64,
        pub name: String,
        pub country: Option<String>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod product {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "products")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: i64,
        pub name: String,
        pub value: i64,
        pub category: Option<String>,
        pub status: i64,
        pub supplier_id: Option<i64>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::supplier::Entity",
            from = "Column::SupplierId",
            to = "super::supplier::Column::Id"
        )]
        Supplier,
    }

    impl Related<super::supplier::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Supplier.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

pub static STATUS: EnumDescriptor = EnumDescriptor {
    name: "Status",
    variants: &[
        EnumVariant::new("Draft"),
        EnumVariant::labeled("Active", "on-sale"),
        EnumVariant::new("Retired"),
    ],
};

static SUPPLIER: Lazy<Schema> = Lazy::new(|| {
    Schema::builder("Supplier")
        .field("name", FieldKind::String)
        .optional("country", FieldKind::String)
        .build()
});

static PRODUCT: Lazy<Schema> = Lazy::new(|| {
    Schema::builder("Product")
        .field("id", FieldKind::I64)
        .field("name", FieldKind::String)
        .field("value", FieldKind::I64)
        .optional("category", FieldKind::String)
        .field("status", FieldKind::Enum(&STATUS))
        .with(FieldDef::nested("supplier", supplier::Model::schema).nullable())
        .build()
});

impl Queryable for supplier::Model {
    fn schema() -> &'static Schema {
        &SUPPLIER
    }

    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "name" => (&self.name).into(),
            "country" => self.country.as_deref().into(),
            _ => FieldValue::Missing,
        }
    }
}

/// Rows carry only the foreign key, so `supplier` is reachable in SQL
/// through a join and not in memory.
impl Queryable for product::Model {
    fn schema() -> &'static Schema {
        &PRODUCT
    }

    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "id" => self.id.into(),
            "name" => (&self.name).into(),
            "value" => self.value.into(),
            "category" => self.category.as_deref().into(),
            "status" => usize::try_from(self.status)
                .ok()
                .and_then(|i| STATUS.value(i))
                .into(),
            _ => FieldValue::Missing,
        }
    }
}

/// Columns of `products` plus the joined supplier columns.
pub fn product_fields() -> Arc<FieldMap<product::Entity>> {
    Arc::new(
        FieldMap::<product::Entity>::from_entity()
            .insert_expr(
                "supplier.name",
                Expr::col((supplier::Entity, supplier::Column::Name)),
            )
            .insert_expr(
                "supplier.country",
                Expr::col((supplier::Entity, supplier::Column::Country)),
            ),
    )
}

/// Fresh in-memory database holding 5 suppliers and 100 products.
///
/// Product `i` has `value` = `i * 10`, `status` = `i % 3`, no category when
/// `i` is a multiple of 3 (otherwise "even"/"odd"), and supplier `i % 5 + 1`
/// unless `i` is a multiple of 4. Suppliers with an even id are in "NL".
pub async fn seeded() -> anyhow::Result<DatabaseConnection> {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).sqlx_logging(false);
    let db = Database::connect(opts).await?;

    let backend = db.get_database_backend();
    let schema = sea_orm::Schema::new(backend);
    db.execute(backend.build(&schema.create_table_from_entity(supplier::Entity)))
        .await?;
    db.execute(backend.build(&schema.create_table_from_entity(product::Entity)))
        .await?;

    supplier::Entity::insert_many((1..=5).map(|id: i64| supplier::ActiveModel {
        id: ActiveValue::Set(id),
        name: ActiveValue::Set(format!("supplier-{id}")),
        country: ActiveValue::Set((id % 2 == 0).then(|| "NL".to_string())),
    }))
    .exec(&db)
    .await?;

    product::Entity::insert_many((1..=100).map(|i: i64| product::ActiveModel {
        id: ActiveValue::Set(i),
        name: ActiveValue::Set(format!("item-{i:03}")),
        value: ActiveValue::Set(i * 10),
        category: ActiveValue::Set(
            (i % 3 != 0).then(|| if i % 2 == 0 { "even" } else { "odd" }.to_string()),
        ),
        status: ActiveValue::Set(i % 3),
        supplier_id: ActiveValue::Set((i % 4 != 0).then_some(i % 5 + 1)),
    }))
    .exec(&db)
    .await?;

    Ok(db)
}

pub fn ids(rows: &[product::Model]) -> Vec<i64> {
    rows.iter().map(|p| p.id).collect()
}
