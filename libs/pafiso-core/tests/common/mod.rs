#![allow(dead_code)]

use once_cell::sync::Lazy;
use pafiso_core::{
    EnumDescriptor, EnumVariant, FieldDef, FieldKind, FieldValue, QueryEnum, Queryable, Schema,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Draft,
    Active,
    Retired,
}

static STATUS: EnumDescriptor = EnumDescriptor {
    name: "Status",
    variants: &[
        EnumVariant::new("Draft"),
        EnumVariant::labeled("Active", "on-sale"),
        EnumVariant::new("Retired"),
    ],
};

impl QueryEnum for Status {
    fn descriptor() -> &'static EnumDescriptor {
        &STATUS
    }

    fn variant_index(&self) -> usize {
        *self as usize
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Supplier {
    pub name: String,
    pub country: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub value: i64,
    pub category: Option<String>,
    pub status: Status,
    pub supplier: Option<Supplier>,
}

static SUPPLIER: Lazy<Schema> = Lazy::new(|| {
    Schema::builder("Supplier")
        .field("name", FieldKind::String)
        .optional("country", FieldKind::String)
        .build()
});

static PRODUCT: Lazy<Schema> = Lazy::new(|| {
    Schema::builder("Product")
        .field("id", FieldKind::I64)
        .with(FieldDef::new("name", FieldKind::String).rename("title"))
        .field("value", FieldKind::I64)
        .optional("category", FieldKind::String)
        .field("status", FieldKind::Enum(&STATUS))
        .with(FieldDef::nested("supplier", Supplier::schema).nullable())
        .build()
});

impl Queryable for Supplier {
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

impl Queryable for Product {
    fn schema() -> &'static Schema {
        &PRODUCT
    }

    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "id" => self.id.into(),
            "name" => (&self.name).into(),
            "value" => self.value.into(),
            "category" => self.category.as_deref().into(),
            "status" => self.status.to_value().into(),
            "supplier" => FieldValue::nested(self.supplier.as_ref()),
            _ => FieldValue::Missing,
        }
    }
}

/// 100 products with `value` = 10, 20, ..., 1000.
pub fn numbered() -> Vec<Product> {
    (1..=100)
        .map(|i| Product {
            id: i,
            name: format!("item-{i:03}"),
            value: i * 10,
            category: (i % 3 != 0).then(|| if i % 2 == 0 { "even" } else { "odd" }.to_string()),
            status: match i % 3 {
                0 => Status::Draft,
                1 => Status::Active,
                _ => Status::Retired,
            },
            supplier: (i % 4 != 0).then(|| Supplier {
                name: format!("supplier-{}", i % 5),
                country: (i % 2 == 0).then(|| "NL".to_string()),
            }),
        })
        .collect()
}

pub fn catalog() -> Vec<Product> {
    let make = |id: i64, name: &str, value: i64, category: Option<&str>| Product {
        id,
        name: name.to_string(),
        value,
        category: category.map(str::to_string),
        status: Status::Active,
        supplier: None,
    };
    vec![
        make(1, "Laptop", 1200, Some("computers")),
        make(2, "Mouse", 25, Some("accessories")),
        make(3, "Desk Lamp", 40, None),
        make(4, "Keyboard", 80, Some("accessories")),
        make(5, "Monitor", 300, Some("computers")),
    ]
}

pub fn ids(items: &[&Product]) -> Vec<i64> {
    items.iter().map(|p| p.id).collect()
}
