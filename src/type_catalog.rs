use crate::comments::CommentMap;
use crate::parser::{is_cfg_test, ParsedFile};
use heck::{ToKebabCase, ToLowerCamelCase, ToShoutyKebabCase, ToShoutySnakeCase, ToSnakeCase, ToUpperCamelCase};
use log::debug;
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;
use syn::ext::IdentExt;
use syn::meta::ParseNestedMeta;
use syn::spanned::Spanned;

/// Index of the record types declared in the scanned sources.
///
/// Built once over the whole tree before any annotation is interpreted, then only read.
/// Every type is reachable under its bare name and under `<package>.<name>`.
#[derive(Debug, Default)]
pub struct TypeCatalog {
    types: Vec<RecordType>,
    /// Sorted so that qualified-suffix lookups are deterministic
    index: BTreeMap<String, usize>,
}

/// A struct declaration reduced to what payload examples need.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordType {
    pub name: String,
    pub package: String,
    /// Fields in declaration order
    pub fields: Vec<CatalogField>,
}

/// One serialized field of a record type.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogField {
    /// Name the field has on the wire
    pub wire_name: String,
    pub example: Value,
}

/// Serde attributes relevant to the wire name of a field
#[derive(Debug, Clone, Default)]
struct SerdeAttributes {
    rename: Option<String>,
    rename_all: Option<String>,
    skip: bool,
}

impl RecordType {
    /// Example payload object built from the field examples.
    pub fn example_payload(&self) -> Value {
        let mut object = Map::new();
        for field in &self.fields {
            object.insert(field.wire_name.clone(), field.example.clone());
        }
        Value::Object(object)
    }
}

impl TypeCatalog {
    /// Catalogues every struct declared in `parsed_files`, including inline modules.
    pub fn build(parsed_files: &[ParsedFile]) -> Self {
        debug!("Building type catalog from {} files", parsed_files.len());

        let mut catalog = Self::default();
        for parsed_file in parsed_files {
            let package = parsed_file.module_name();
            catalog.collect_items(
                &parsed_file.syntax_tree.items,
                &package,
                &parsed_file.comments,
            );
        }

        debug!(
            "Type catalog holds {} types under {} keys",
            catalog.types.len(),
            catalog.index.len()
        );
        catalog
    }

    /// `#[cfg(test)]` structs and modules are left out.
    fn collect_items(&mut self, items: &[syn::Item], package: &str, comments: &CommentMap) {
        for item in items {
            match item {
                syn::Item::Struct(item_struct) if is_cfg_test(&item_struct.attrs) => {
                    debug!("Skipping test-only struct {}", item_struct.ident);
                }
                syn::Item::Mod(item_mod) if is_cfg_test(&item_mod.attrs) => {
                    debug!("Skipping test module {}", item_mod.ident);
                }
                syn::Item::Struct(item_struct) => {
                    let record = Self::parse_struct_definition(item_struct, package, comments);
                    self.insert(record);
                }
                syn::Item::Mod(item_mod) => {
                    if let Some((_, nested)) = &item_mod.content {
                        let nested_package = item_mod.ident.unraw().to_string();
                        self.collect_items(nested, &nested_package, comments);
                    }
                }
                _ => {}
            }
        }
    }

    /// Adds a record type. A later type with the same key replaces the earlier one.
    pub fn insert(&mut self, record: RecordType) {
        let idx = self.types.len();
        let qualified = format!("{}.{}", record.package, record.name);
        debug!("Cataloguing type {} ({} fields)", qualified, record.fields.len());

        self.index.insert(record.name.clone(), idx);
        self.index.insert(qualified, idx);
        self.types.push(record);
    }

    /// Exact key lookup.
    pub fn get(&self, key: &str) -> Option<&RecordType> {
        self.index.get(key).map(|&idx| &self.types[idx])
    }

    /// Resolves a type reference from a `@Payload` directive.
    ///
    /// Tries the exact key first, then the first key (in sorted order) qualified by any
    /// package, i.e. ending in `.<reference>`. There is no fuzzy matching: anything else is
    /// a miss. Rust paths (`models::User`) are accepted as `models.User`.
    pub fn resolve(&self, reference: &str) -> Option<&RecordType> {
        let reference = reference.replace("::", ".");

        if let Some(record) = self.get(&reference) {
            return Some(record);
        }

        let suffix = format!(".{}", reference);
        self.index
            .iter()
            .find(|(key, _)| key.ends_with(&suffix))
            .map(|(_, &idx)| &self.types[idx])
    }

    /// All lookup keys in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.index.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Parse a struct definition into a RecordType
    fn parse_struct_definition(
        item_struct: &syn::ItemStruct,
        package: &str,
        comments: &CommentMap,
    ) -> RecordType {
        let name = item_struct.ident.unraw().to_string();
        debug!("Parsing struct definition: {}", name);

        let container_attrs = Self::parse_serde_attributes(&item_struct.attrs);
        let mut fields = Vec::new();

        if let syn::Fields::Named(named_fields) = &item_struct.fields {
            let brace_line = named_fields.brace_token.span.open().start().line;
            for field in &named_fields.named {
                if let Some(catalog_field) = Self::parse_field(
                    field,
                    container_attrs.rename_all.as_deref(),
                    comments,
                    brace_line,
                ) {
                    fields.push(catalog_field);
                }
            }
        }

        RecordType {
            name,
            package: package.to_string(),
            fields,
        }
    }

    /// Parse a single field. Returns `None` for fields that never reach the wire.
    fn parse_field(
        field: &syn::Field,
        rename_all: Option<&str>,
        comments: &CommentMap,
        brace_line: usize,
    ) -> Option<CatalogField> {
        let ident = field.ident.as_ref()?;
        let declared = ident.unraw().to_string();
        let serde_attrs = Self::parse_serde_attributes(&field.attrs);

        if serde_attrs.skip {
            debug!("Field {} is skipped by serde", declared);
            return None;
        }

        let wire_name = match serde_attrs.rename {
            Some(rename) => rename,
            None => match rename_all {
                Some(rule) => apply_rename_rule(&declared, rule),
                None => declared,
            },
        };
        if wire_name.is_empty() {
            return None;
        }

        let example = match Self::explicit_example(field, comments, brace_line) {
            Some(raw) => parse_example_literal(&raw),
            None => infer_example(&field.ty)?,
        };

        Some(CatalogField { wire_name, example })
    }

    /// `Example:` value from the comments documenting the field, or trailing it.
    ///
    /// Comments directly above the field (doc or plain, attributes may sit in between) take
    /// precedence; among them the last `Example:` line wins. Nothing at or above the
    /// struct's opening brace belongs to the field.
    fn explicit_example(
        field: &syn::Field,
        comments: &CommentMap,
        brace_line: usize,
    ) -> Option<String> {
        let ident_line = field.ident.as_ref()?.span().start().line;
        let attrs_start = field
            .attrs
            .first()
            .map(|attr| attr.pound_token.span.start().line)
            .unwrap_or(ident_line);

        let mut doc_example = None;
        let mut line = ident_line;
        while line > brace_line + 1 {
            line -= 1;
            match comments.own_line(line) {
                Some(text) => {
                    // walking upwards, so the first hit is the last line
                    if doc_example.is_none() {
                        doc_example = example_text(text);
                    }
                }
                None if line >= attrs_start => continue,
                None => break,
            }
        }
        if doc_example.is_some() {
            return doc_example;
        }

        let end_line = field.ty.span().end().line;
        if end_line == brace_line {
            return None;
        }
        comments.trailing(end_line).and_then(example_text)
    }

    /// Parse Serde attributes from item or field attributes
    fn parse_serde_attributes(attrs: &[syn::Attribute]) -> SerdeAttributes {
        let mut serde_attrs = SerdeAttributes::default();

        for attr in attrs {
            if !attr.path().is_ident("serde") {
                continue;
            }

            let result = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    if let Some(value) = serialize_name(&meta)? {
                        serde_attrs.rename = Some(value);
                    }
                } else if meta.path.is_ident("rename_all") {
                    if let Some(value) = serialize_name(&meta)? {
                        serde_attrs.rename_all = Some(value);
                    }
                } else if meta.path.is_ident("skip") || meta.path.is_ident("skip_serializing") {
                    serde_attrs.skip = true;
                } else {
                    skip_meta_value(&meta)?;
                }
                Ok(())
            });

            if let Err(e) = result {
                debug!("Ignoring unparsable serde attribute: {}", e);
            }
        }

        serde_attrs
    }
}

/// Reads `name = "x"` or `name(serialize = "x", ...)`.
fn serialize_name(meta: &ParseNestedMeta) -> syn::Result<Option<String>> {
    if meta.input.peek(syn::Token![=]) {
        let lit: syn::LitStr = meta.value()?.parse()?;
        return Ok(Some(lit.value()));
    }

    let mut name = None;
    meta.parse_nested_meta(|inner| {
        if inner.path.is_ident("serialize") {
            let lit: syn::LitStr = inner.value()?.parse()?;
            name = Some(lit.value());
        } else {
            skip_meta_value(&inner)?;
        }
        Ok(())
    })?;
    Ok(name)
}

/// Consumes the value of a serde option this crate has no use for.
fn skip_meta_value(meta: &ParseNestedMeta) -> syn::Result<()> {
    if meta.input.peek(syn::Token![=]) {
        let _: syn::Expr = meta.value()?.parse()?;
    } else if meta.input.peek(syn::token::Paren) {
        let content;
        syn::parenthesized!(content in meta.input);
        let _: proc_macro2::TokenStream = content.parse()?;
    }
    Ok(())
}

fn apply_rename_rule(name: &str, rule: &str) -> String {
    match rule {
        "lowercase" => name.to_lowercase(),
        "UPPERCASE" => name.to_uppercase(),
        "PascalCase" => name.to_upper_camel_case(),
        "camelCase" => name.to_lower_camel_case(),
        "snake_case" => name.to_snake_case(),
        "SCREAMING_SNAKE_CASE" => name.to_shouty_snake_case(),
        "kebab-case" => name.to_kebab_case(),
        "SCREAMING-KEBAB-CASE" => name.to_shouty_kebab_case(),
        _ => name.to_string(),
    }
}

fn example_text(comment: &str) -> Option<String> {
    let value = comment.strip_prefix("Example:")?.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Interprets an `Example:` value: integer, float, JSON object/array, else string.
pub fn parse_example_literal(raw: &str) -> Value {
    let text = if raw.len() > 1 && raw.starts_with('"') && raw.ends_with('"') {
        &raw[1..raw.len() - 1]
    } else {
        raw
    };

    if let Ok(int) = text.parse::<i64>() {
        return Value::from(int);
    }
    if let Some(number) = text.parse::<f64>().ok().and_then(Number::from_f64) {
        return Value::Number(number);
    }
    let is_object = text.starts_with('{') && text.ends_with('}');
    let is_array = text.starts_with('[') && text.ends_with(']');
    if is_object || is_array {
        if let Ok(json) = serde_json::from_str(text) {
            return json;
        }
    }

    Value::String(text.to_string())
}

/// Placeholder example for a declared type. `None` for type shapes that have no name.
pub fn infer_example(ty: &syn::Type) -> Option<Value> {
    match ty {
        syn::Type::Path(type_path) => {
            let segment = type_path.path.segments.last()?;
            let type_name = segment.ident.to_string();

            let value = match type_name.as_str() {
                "String" | "str" | "char" => Value::from("string"),
                "i8" | "i16" | "i32" | "i64" | "i128" | "isize" | "u8" | "u16" | "u32" | "u64"
                | "u128" | "usize" => Value::from(0),
                "bool" => Value::Bool(false),
                "Vec" | "VecDeque" | "LinkedList" | "HashSet" | "BTreeSet" | "IndexSet" => {
                    Value::Array(Vec::new())
                }
                "HashMap" | "BTreeMap" | "IndexMap" => Value::Object(Map::new()),
                "Option" | "Box" | "Rc" | "Arc" | "Cow" => {
                    return first_type_argument(segment)
                        .and_then(infer_example)
                        .or(Some(Value::String(type_name)));
                }
                _ => Value::String(type_name),
            };
            Some(value)
        }
        syn::Type::Reference(reference) => infer_example(&reference.elem),
        syn::Type::Array(_) | syn::Type::Slice(_) => Some(Value::Array(Vec::new())),
        syn::Type::Paren(paren) => infer_example(&paren.elem),
        syn::Type::Group(group) => infer_example(&group.elem),
        _ => None,
    }
}

fn first_type_argument(segment: &syn::PathSegment) -> Option<&syn::Type> {
    if let syn::PathArguments::AngleBracketed(args) = &segment.arguments {
        for arg in &args.args {
            if let syn::GenericArgument::Type(ty) = arg {
                return Some(ty);
            }
        }
    }
    None
}
