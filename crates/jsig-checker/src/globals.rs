//! Built-in global scope: language identifiers, operator signatures and
//! the virtual types behind member access on primitives.
//!
//! A globals header passed through `CheckerOptions::globals_file` is bound
//! on top of these and may replace any identifier.

use jsig_binder::GlobalScope;
use jsig_solver::{
    FunctionShape, GenericVar, ObjectShape, ParamInfo, PathStep, PropertyInfo, TypeId, TypeInterner,
};
use smallvec::SmallVec;

pub(crate) fn build_global_scope(types: &TypeInterner) -> GlobalScope {
    let mut globals = GlobalScope::new();
    let builder = Builder { types };
    builder.add_identifiers(&mut globals);
    builder.add_virtual_types(&mut globals);
    builder.add_operators(&mut globals);
    globals
}

struct Builder<'a> {
    types: &'a TypeInterner,
}

impl Builder<'_> {
    // =========================================================================
    // Identifiers
    // =========================================================================

    fn add_identifiers(&self, globals: &mut GlobalScope) {
        let types = self.types;
        let bind = |globals: &mut GlobalScope, name: &str, type_id: TypeId| {
            globals.add_var(types.intern_string(name), type_id);
        };

        let object = self.object(&[
            (
                "create",
                self.func(&[types.union2(TypeId::OBJECT, TypeId::NULL)], TypeId::OPEN_OBJECT),
            ),
            (
                "keys",
                self.func(&[TypeId::OBJECT], types.array(TypeId::STRING)),
            ),
        ]);
        bind(globals, "Object", object);

        let array = self.object(&[("isArray", self.func(&[TypeId::ANY], TypeId::BOOLEAN))]);
        bind(globals, "Array", array);

        let log = self.variadic(TypeId::ANY, 8, TypeId::VOID);
        let console = self.object(&[("log", log), ("error", log), ("warn", log), ("info", log)]);
        bind(globals, "console", console);

        let math = self.object(&[
            ("floor", self.func(&[TypeId::NUMBER], TypeId::NUMBER)),
            ("ceil", self.func(&[TypeId::NUMBER], TypeId::NUMBER)),
            ("round", self.func(&[TypeId::NUMBER], TypeId::NUMBER)),
            ("abs", self.func(&[TypeId::NUMBER], TypeId::NUMBER)),
            ("random", self.func(&[], TypeId::NUMBER)),
        ]);
        bind(globals, "Math", math);

        let json = self.object(&[
            ("stringify", self.func(&[TypeId::ANY], TypeId::STRING)),
            ("parse", self.func(&[TypeId::STRING], TypeId::ANY)),
        ]);
        bind(globals, "JSON", json);

        let error_instance = types.with_brand(
            self.object(&[("message", TypeId::STRING)]),
            "Error",
        );
        let error = types.function(FunctionShape {
            params: vec![optional(TypeId::STRING)],
            result: TypeId::VOID,
            this_arg: Some(error_instance),
            generics: Vec::new(),
            brand: types.intern_string("Error"),
        });
        bind(globals, "Error", error);

        for (name, result) in [
            ("String", TypeId::STRING),
            ("Number", TypeId::NUMBER),
            ("Boolean", TypeId::BOOLEAN),
        ] {
            bind(globals, name, self.func(&[TypeId::ANY], result));
        }

        let parse_int = types.function(FunctionShape {
            params: vec![ParamInfo::unnamed(TypeId::STRING), optional(TypeId::NUMBER)],
            ..self.shape(TypeId::NUMBER)
        });
        bind(globals, "parseInt", parse_int);
        bind(globals, "isNaN", self.func(&[TypeId::ANY], TypeId::BOOLEAN));
    }

    // =========================================================================
    // Virtual types
    // =========================================================================

    fn add_virtual_types(&self, globals: &mut GlobalScope) {
        let types = self.types;
        let t = types.free("T");
        let array_of_t = types.array(t);
        let receiver_t = || generic("T", &[PathStep::ThisArg, PathStep::TypeArg(0)]);

        let push = types.function(FunctionShape {
            params: vec![ParamInfo::unnamed(t)],
            this_arg: Some(array_of_t),
            generics: vec![
                self.generic_var(receiver_t()),
                self.generic_var(generic("T", &[PathStep::Arg(0)])),
            ],
            ..self.shape(TypeId::NUMBER)
        });
        let index_of = types.function(FunctionShape {
            params: vec![ParamInfo::unnamed(t)],
            this_arg: Some(array_of_t),
            generics: vec![
                self.generic_var(receiver_t()),
                self.generic_var(generic("T", &[PathStep::Arg(0)])),
            ],
            ..self.shape(TypeId::NUMBER)
        });
        let slice = types.function(FunctionShape {
            params: vec![optional(TypeId::NUMBER), optional(TypeId::NUMBER)],
            this_arg: Some(array_of_t),
            generics: vec![
                self.generic_var(receiver_t()),
                self.generic_var(generic("T", &[PathStep::Result, PathStep::TypeArg(0)])),
            ],
            ..self.shape(array_of_t)
        });
        let join = types.function(FunctionShape {
            params: vec![optional(TypeId::STRING)],
            ..self.shape(TypeId::STRING)
        });
        let t_array = self.object(&[
            ("length", TypeId::NUMBER),
            ("push", push),
            ("indexOf", index_of),
            ("slice", slice),
            ("join", join),
        ]);
        globals.add_virtual_type("TArray", t_array);

        let t_string = self.object(&[
            ("length", TypeId::NUMBER),
            ("split", self.func(&[TypeId::STRING], types.array(TypeId::STRING))),
            ("indexOf", self.func(&[TypeId::STRING], TypeId::NUMBER)),
            (
                "slice",
                types.function(FunctionShape {
                    params: vec![ParamInfo::unnamed(TypeId::NUMBER), optional(TypeId::NUMBER)],
                    ..self.shape(TypeId::STRING)
                }),
            ),
            ("charAt", self.func(&[TypeId::NUMBER], TypeId::STRING)),
            ("toUpperCase", self.func(&[], TypeId::STRING)),
            ("toLowerCase", self.func(&[], TypeId::STRING)),
            ("trim", self.func(&[], TypeId::STRING)),
        ]);
        globals.add_virtual_type("TString", t_string);

        let to_fixed = types.function(FunctionShape {
            params: vec![optional(TypeId::NUMBER)],
            ..self.shape(TypeId::STRING)
        });
        let t_number = self.object(&[("toFixed", to_fixed)]);
        globals.add_virtual_type("TNumber", t_number);
    }

    // =========================================================================
    // Operators
    // =========================================================================

    fn add_operators(&self, globals: &mut GlobalScope) {
        let types = self.types;
        let numeric = self.func(&[TypeId::NUMBER, TypeId::NUMBER], TypeId::NUMBER);
        let negate = self.func(&[TypeId::NUMBER], TypeId::NUMBER);
        let compare = self.func(&[TypeId::NUMBER, TypeId::NUMBER], TypeId::BOOLEAN);
        let equality = self.func(&[TypeId::ANY, TypeId::ANY], TypeId::BOOLEAN);

        let plus = types.intersection(vec![
            numeric,
            self.func(&[TypeId::STRING, TypeId::STRING], TypeId::STRING),
            negate,
        ]);
        globals.add_operator("+", plus);
        globals.add_operator("-", types.intersection(vec![numeric, negate]));

        for op in ["*", "/", "%", "<<", ">>", ">>>", "&", "|", "^"] {
            globals.add_operator(op, numeric);
        }
        for op in ["<", ">", "<=", ">="] {
            globals.add_operator(op, compare);
        }
        for op in ["==", "===", "!=", "!==", "instanceof", "in"] {
            globals.add_operator(op, equality);
        }

        globals.add_operator("!", self.func(&[TypeId::ANY], TypeId::BOOLEAN));
        globals.add_operator("typeof", self.func(&[TypeId::ANY], TypeId::STRING));
        globals.add_operator("void", self.func(&[TypeId::ANY], TypeId::VOID));
        globals.add_operator("delete", self.func(&[TypeId::ANY], TypeId::BOOLEAN));
        globals.add_operator("~", negate);
        globals.add_operator("++", negate);
        globals.add_operator("--", negate);
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn shape(&self, result: TypeId) -> FunctionShape {
        FunctionShape {
            params: Vec::new(),
            result,
            this_arg: None,
            generics: Vec::new(),
            brand: self.types.intern_string("Object"),
        }
    }

    fn func(&self, params: &[TypeId], result: TypeId) -> TypeId {
        self.types.function(FunctionShape {
            params: params.iter().copied().map(ParamInfo::unnamed).collect(),
            ..self.shape(result)
        })
    }

    /// `count` optional parameters of one type.
    fn variadic(&self, param: TypeId, count: usize, result: TypeId) -> TypeId {
        self.types.function(FunctionShape {
            params: (0..count).map(|_| optional(param)).collect(),
            ..self.shape(result)
        })
    }

    fn object(&self, fields: &[(&str, TypeId)]) -> TypeId {
        let brand = self.types.intern_string("Object");
        self.types.object_with_shape(ObjectShape {
            properties: fields
                .iter()
                .map(|&(name, type_id)| PropertyInfo::new(self.types.intern_string(name), type_id))
                .collect(),
            open: false,
            brand,
        })
    }

    fn generic_var(&self, (name, location): (&str, SmallVec<[PathStep; 4]>)) -> GenericVar {
        GenericVar {
            name: self.types.intern_string(name),
            location,
        }
    }
}

fn generic<'n>(name: &'n str, location: &[PathStep]) -> (&'n str, SmallVec<[PathStep; 4]>) {
    (name, SmallVec::from_slice(location))
}

fn optional(type_id: TypeId) -> ParamInfo {
    ParamInfo {
        optional: true,
        ..ParamInfo::unnamed(type_id)
    }
}
