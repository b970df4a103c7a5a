//! Type formatting for diagnostic messages.

use crate::TypeInterner;
use crate::types::{FunctionShape, ObjectShape, TypeData, TypeId};

/// Renders types in signature syntax on a single line.
pub struct TypeFormatter<'a> {
    interner: &'a TypeInterner,
    max_depth: u32,
}

impl<'a> TypeFormatter<'a> {
    pub fn new(interner: &'a TypeInterner) -> Self {
        TypeFormatter {
            interner,
            max_depth: 8,
        }
    }

    pub fn format(&self, type_id: TypeId) -> String {
        self.format_at(type_id, 0)
    }

    fn format_at(&self, type_id: TypeId, depth: u32) -> String {
        if depth > self.max_depth {
            return "...".to_string();
        }
        let Some(data) = self.interner.lookup(type_id) else {
            return format!("<unknown #{}>", type_id.0);
        };

        match data.as_ref() {
            TypeData::Literal { name, .. }
            | TypeData::Renamed { name, .. }
            | TypeData::Free(name) => self.interner.resolve_atom(*name),
            TypeData::Value { value, .. } => self.interner.resolve_atom(*value),
            TypeData::Object(shape) => self.format_object(shape, depth),
            TypeData::Union(members) => self.join(members, " | ", depth),
            TypeData::Intersection(members) => self.join(members, " & ", depth),
            TypeData::Function(shape) => self.format_function(shape, depth),
            TypeData::Generic { base, args } => format!(
                "{}<{}>",
                self.format_at(*base, depth + 1),
                self.join(args, ", ", depth)
            ),
            TypeData::Tuple(elements) => format!("[{}]", self.join(elements, ", ", depth)),
        }
    }

    fn join(&self, members: &[TypeId], sep: &str, depth: u32) -> String {
        members
            .iter()
            .map(|&m| self.format_at(m, depth + 1))
            .collect::<Vec<_>>()
            .join(sep)
    }

    fn format_object(&self, shape: &ObjectShape, depth: u32) -> String {
        if shape.properties.is_empty() {
            return "{}".to_string();
        }
        let fields: Vec<String> = shape
            .properties
            .iter()
            .map(|p| {
                format!(
                    "{}{}: {}",
                    self.interner.resolve_atom_ref(p.name),
                    if p.optional { "?" } else { "" },
                    self.format_at(p.type_id, depth + 1)
                )
            })
            .collect();
        format!("{{ {} }}", fields.join(", "))
    }

    fn format_function(&self, shape: &FunctionShape, depth: u32) -> String {
        let mut parts = Vec::with_capacity(shape.params.len() + 1);
        if let Some(this_arg) = shape.this_arg {
            parts.push(format!("this: {}", self.format_at(this_arg, depth + 1)));
        }
        for param in &shape.params {
            let ty = self.format_at(param.type_id, depth + 1);
            let marker = if param.optional { "?" } else { "" };
            parts.push(match param.name {
                Some(name) => format!("{}{marker}: {ty}", self.interner.resolve_atom_ref(name)),
                None if param.optional => format!("{ty}?"),
                None => ty,
            });
        }
        format!(
            "({}) => {}",
            parts.join(", "),
            self.format_at(shape.result, depth + 1)
        )
    }
}
