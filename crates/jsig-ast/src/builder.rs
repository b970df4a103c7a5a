//! Hand-construction helpers for both syntax trees.
//!
//! `js` builds source nodes with empty spans; `js::at` stamps a line onto a
//! statement and every nested node that has no span yet. `sig` builds
//! signature-language expressions the way the header grammar would.

pub mod js {
    use crate::estree::*;
    use jsig_common::SourceLocation;

    pub fn id(name: &str) -> Identifier {
        Identifier {
            name: name.to_string(),
            loc: SourceLocation::default(),
        }
    }

    pub fn ident(name: &str) -> Expression {
        Expression::Identifier(id(name))
    }

    fn literal(value: serde_json::Value) -> Expression {
        Expression::Literal(Literal {
            value,
            regex: None,
            raw: None,
            loc: SourceLocation::default(),
        })
    }

    pub fn string(value: &str) -> Expression {
        literal(serde_json::Value::String(value.to_string()))
    }

    pub fn number(value: i64) -> Expression {
        literal(serde_json::Value::from(value))
    }

    pub fn boolean(value: bool) -> Expression {
        literal(serde_json::Value::Bool(value))
    }

    pub fn null() -> Expression {
        literal(serde_json::Value::Null)
    }

    pub fn regex(pattern: &str) -> Expression {
        Expression::Literal(Literal {
            value: serde_json::Value::Null,
            regex: Some(RegexLiteral {
                pattern: pattern.to_string(),
                flags: String::new(),
            }),
            raw: None,
            loc: SourceLocation::default(),
        })
    }

    pub fn this() -> Expression {
        Expression::ThisExpression(ThisExpression::default())
    }

    pub fn array(elements: Vec<Expression>) -> Expression {
        Expression::ArrayExpression(ArrayExpression {
            elements,
            loc: SourceLocation::default(),
        })
    }

    pub fn object(properties: Vec<(&str, Expression)>) -> Expression {
        let properties = properties
            .into_iter()
            .map(|(key, value)| Property {
                key: ident(key),
                value,
                kind: "init".to_string(),
                loc: SourceLocation::default(),
            })
            .collect();
        Expression::ObjectExpression(ObjectExpression {
            properties,
            loc: SourceLocation::default(),
        })
    }

    pub fn member(object: Expression, property: &str) -> Expression {
        Expression::MemberExpression(MemberExpression {
            object: Box::new(object),
            property: Box::new(ident(property)),
            computed: false,
            loc: SourceLocation::default(),
        })
    }

    pub fn index(object: Expression, property: Expression) -> Expression {
        Expression::MemberExpression(MemberExpression {
            object: Box::new(object),
            property: Box::new(property),
            computed: true,
            loc: SourceLocation::default(),
        })
    }

    fn call_expr(callee: Expression, arguments: Vec<Expression>) -> CallExpression {
        CallExpression {
            callee: Box::new(callee),
            arguments,
            loc: SourceLocation::default(),
        }
    }

    pub fn call(callee: Expression, arguments: Vec<Expression>) -> Expression {
        Expression::CallExpression(call_expr(callee, arguments))
    }

    pub fn new(callee: Expression, arguments: Vec<Expression>) -> Expression {
        Expression::NewExpression(call_expr(callee, arguments))
    }

    pub fn assign(left: Expression, right: Expression) -> Expression {
        assign_op("=", left, right)
    }

    pub fn assign_op(operator: &str, left: Expression, right: Expression) -> Expression {
        Expression::AssignmentExpression(AssignmentExpression {
            operator: operator.to_string(),
            left: Box::new(left),
            right: Box::new(right),
            loc: SourceLocation::default(),
        })
    }

    pub fn binary(operator: &str, left: Expression, right: Expression) -> Expression {
        Expression::BinaryExpression(BinaryExpression {
            operator: operator.to_string(),
            left: Box::new(left),
            right: Box::new(right),
            loc: SourceLocation::default(),
        })
    }

    pub fn logical(operator: &str, left: Expression, right: Expression) -> Expression {
        Expression::LogicalExpression(LogicalExpression {
            operator: operator.to_string(),
            left: Box::new(left),
            right: Box::new(right),
            loc: SourceLocation::default(),
        })
    }

    pub fn unary(operator: &str, argument: Expression) -> Expression {
        Expression::UnaryExpression(UnaryExpression {
            operator: operator.to_string(),
            argument: Box::new(argument),
            prefix: true,
            loc: SourceLocation::default(),
        })
    }

    pub fn update(operator: &str, argument: Expression, prefix: bool) -> Expression {
        Expression::UpdateExpression(UpdateExpression {
            operator: operator.to_string(),
            argument: Box::new(argument),
            prefix,
            loc: SourceLocation::default(),
        })
    }

    pub fn conditional(test: Expression, consequent: Expression, alternate: Expression) -> Expression {
        Expression::ConditionalExpression(ConditionalExpression {
            test: Box::new(test),
            consequent: Box::new(consequent),
            alternate: Box::new(alternate),
            loc: SourceLocation::default(),
        })
    }

    fn function(name: Option<&str>, params: &[&str], body: Vec<Statement>) -> Function {
        Function {
            id: name.map(id),
            params: params.iter().map(|p| id(p)).collect(),
            body: BlockStatement {
                body,
                loc: SourceLocation::default(),
            },
            loc: SourceLocation::default(),
        }
    }

    pub fn function_expr(name: Option<&str>, params: &[&str], body: Vec<Statement>) -> Expression {
        Expression::FunctionExpression(function(name, params, body))
    }

    pub fn function_decl(name: &str, params: &[&str], body: Vec<Statement>) -> Statement {
        Statement::FunctionDeclaration(function(Some(name), params, body))
    }

    pub fn var(name: &str, init: Option<Expression>) -> Statement {
        Statement::VariableDeclaration(VariableDeclaration {
            declarations: vec![VariableDeclarator {
                id: id(name),
                init,
                loc: SourceLocation::default(),
            }],
            kind: "var".to_string(),
            loc: SourceLocation::default(),
        })
    }

    pub fn expr(expression: Expression) -> Statement {
        Statement::ExpressionStatement(ExpressionStatement {
            expression,
            loc: SourceLocation::default(),
        })
    }

    pub fn block(body: Vec<Statement>) -> Statement {
        Statement::BlockStatement(BlockStatement {
            body,
            loc: SourceLocation::default(),
        })
    }

    pub fn if_(test: Expression, consequent: Vec<Statement>, alternate: Option<Vec<Statement>>) -> Statement {
        Statement::IfStatement(IfStatement {
            test,
            consequent: Box::new(block(consequent)),
            alternate: alternate.map(|alt| Box::new(block(alt))),
            loc: SourceLocation::default(),
        })
    }

    pub fn while_(test: Expression, body: Vec<Statement>) -> Statement {
        Statement::WhileStatement(WhileStatement {
            test,
            body: Box::new(block(body)),
            loc: SourceLocation::default(),
        })
    }

    pub fn for_(
        init: Option<ForInit>,
        test: Option<Expression>,
        update: Option<Expression>,
        body: Vec<Statement>,
    ) -> Statement {
        Statement::ForStatement(ForStatement {
            init,
            test,
            update,
            body: Box::new(block(body)),
            loc: SourceLocation::default(),
        })
    }

    pub fn return_(argument: Option<Expression>) -> Statement {
        Statement::ReturnStatement(ReturnStatement {
            argument,
            loc: SourceLocation::default(),
        })
    }

    pub fn throw(argument: Expression) -> Statement {
        Statement::ThrowStatement(ThrowStatement {
            argument,
            loc: SourceLocation::default(),
        })
    }

    /// Stamp `line` onto `statement` and every nested node without a span.
    pub fn at(line: u32, mut statement: Statement) -> Statement {
        place_statement(&mut statement, line);
        statement
    }

    /// Build a program from already placed statements.
    pub fn program(body: Vec<Statement>) -> Program {
        Program {
            body,
            loc: SourceLocation::default(),
        }
    }

    pub fn source(path: &str, text: &str, body: Vec<Statement>) -> SourceFile {
        SourceFile::new(path, text, program(body))
    }

    fn place(loc: &mut SourceLocation, line: u32) {
        if *loc == SourceLocation::default() {
            *loc = SourceLocation::on_line(line, 0, 0);
        }
    }

    fn place_statement(statement: &mut Statement, line: u32) {
        match statement {
            Statement::VariableDeclaration(decl) => place_declaration(decl, line),
            Statement::FunctionDeclaration(func) => place_function(func, line),
            Statement::ExpressionStatement(stmt) => {
                place(&mut stmt.loc, line);
                place_expression(&mut stmt.expression, line);
            }
            Statement::BlockStatement(block) => place_block(block, line),
            Statement::IfStatement(stmt) => {
                place(&mut stmt.loc, line);
                place_expression(&mut stmt.test, line);
                place_statement(&mut stmt.consequent, line);
                if let Some(alt) = stmt.alternate.as_mut() {
                    place_statement(alt, line);
                }
            }
            Statement::WhileStatement(stmt) => {
                place(&mut stmt.loc, line);
                place_expression(&mut stmt.test, line);
                place_statement(&mut stmt.body, line);
            }
            Statement::ForStatement(stmt) => {
                place(&mut stmt.loc, line);
                match stmt.init.as_mut() {
                    Some(ForInit::Declaration(decl)) => place_declaration(decl, line),
                    Some(ForInit::Expression(e)) => place_expression(e, line),
                    None => {}
                }
                for e in [stmt.test.as_mut(), stmt.update.as_mut()].into_iter().flatten() {
                    place_expression(e, line);
                }
                place_statement(&mut stmt.body, line);
            }
            Statement::ReturnStatement(stmt) => {
                place(&mut stmt.loc, line);
                if let Some(arg) = stmt.argument.as_mut() {
                    place_expression(arg, line);
                }
            }
            Statement::ThrowStatement(stmt) => {
                place(&mut stmt.loc, line);
                place_expression(&mut stmt.argument, line);
            }
            Statement::EmptyStatement(stmt) => place(&mut stmt.loc, line),
        }
    }

    fn place_declaration(decl: &mut VariableDeclaration, line: u32) {
        place(&mut decl.loc, line);
        for d in &mut decl.declarations {
            place(&mut d.loc, line);
            place(&mut d.id.loc, line);
            if let Some(init) = d.init.as_mut() {
                place_expression(init, line);
            }
        }
    }

    fn place_block(block: &mut BlockStatement, line: u32) {
        place(&mut block.loc, line);
        for s in &mut block.body {
            place_statement(s, line);
        }
    }

    fn place_function(func: &mut Function, line: u32) {
        place(&mut func.loc, line);
        if let Some(id) = func.id.as_mut() {
            place(&mut id.loc, line);
        }
        for p in &mut func.params {
            place(&mut p.loc, line);
        }
        place_block(&mut func.body, line);
    }

    fn place_expression(expression: &mut Expression, line: u32) {
        match expression {
            Expression::Identifier(n) => place(&mut n.loc, line),
            Expression::Literal(n) => place(&mut n.loc, line),
            Expression::ThisExpression(n) => place(&mut n.loc, line),
            Expression::ArrayExpression(n) => {
                place(&mut n.loc, line);
                for e in &mut n.elements {
                    place_expression(e, line);
                }
            }
            Expression::ObjectExpression(n) => {
                place(&mut n.loc, line);
                for p in &mut n.properties {
                    place(&mut p.loc, line);
                    place_expression(&mut p.key, line);
                    place_expression(&mut p.value, line);
                }
            }
            Expression::FunctionExpression(f) => place_function(f, line),
            Expression::AssignmentExpression(n) => {
                place(&mut n.loc, line);
                place_expression(&mut n.left, line);
                place_expression(&mut n.right, line);
            }
            Expression::MemberExpression(n) => {
                place(&mut n.loc, line);
                place_expression(&mut n.object, line);
                place_expression(&mut n.property, line);
            }
            Expression::CallExpression(n) | Expression::NewExpression(n) => {
                place(&mut n.loc, line);
                place_expression(&mut n.callee, line);
                for a in &mut n.arguments {
                    place_expression(a, line);
                }
            }
            Expression::BinaryExpression(n) => {
                place(&mut n.loc, line);
                place_expression(&mut n.left, line);
                place_expression(&mut n.right, line);
            }
            Expression::LogicalExpression(n) => {
                place(&mut n.loc, line);
                place_expression(&mut n.left, line);
                place_expression(&mut n.right, line);
            }
            Expression::UnaryExpression(n) => {
                place(&mut n.loc, line);
                place_expression(&mut n.argument, line);
            }
            Expression::UpdateExpression(n) => {
                place(&mut n.loc, line);
                place_expression(&mut n.argument, line);
            }
            Expression::ConditionalExpression(n) => {
                place(&mut n.loc, line);
                place_expression(&mut n.test, line);
                place_expression(&mut n.consequent, line);
                place_expression(&mut n.alternate, line);
            }
        }
    }
}

pub mod sig {
    use crate::type_expr::*;

    pub fn literal(name: &str) -> TypeExpr {
        TypeExpr::Literal(LiteralExpr {
            name: name.to_string(),
            builtin: None,
            label: None,
            optional: false,
        })
    }

    pub fn value(value: &str) -> TypeExpr {
        TypeExpr::Value(ValueExpr {
            value: value.to_string(),
            name: value.to_string(),
            label: None,
        })
    }

    /// Attach an argument label, as in `(name: String) => void`.
    pub fn labeled(label: &str, mut expr: TypeExpr) -> TypeExpr {
        let slot = match &mut expr {
            TypeExpr::Object(e) => &mut e.label,
            TypeExpr::Union(e) => &mut e.label,
            TypeExpr::Intersection(e) => &mut e.label,
            TypeExpr::Literal(e) => &mut e.label,
            TypeExpr::Value(e) => &mut e.label,
            TypeExpr::Function(e) => &mut e.label,
            TypeExpr::Generic(e) => &mut e.label,
            TypeExpr::Tuple(e) => &mut e.label,
            TypeExpr::Renamed(e) => &mut e.label,
            TypeExpr::Free(_) => return expr,
        };
        *slot = Some(label.to_string());
        expr
    }

    /// Mark an argument as optional, as in `(name?: String) => void`.
    pub fn optional(mut expr: TypeExpr) -> TypeExpr {
        match &mut expr {
            TypeExpr::Object(e) => e.optional = true,
            TypeExpr::Union(e) => e.optional = true,
            TypeExpr::Intersection(e) => e.optional = true,
            TypeExpr::Literal(e) => e.optional = true,
            TypeExpr::Function(e) => e.optional = true,
            TypeExpr::Tuple(e) => e.optional = true,
            TypeExpr::Renamed(e) => e.optional = true,
            TypeExpr::Value(_) | TypeExpr::Generic(_) | TypeExpr::Free(_) => {}
        }
        expr
    }

    pub fn object(fields: Vec<(&str, TypeExpr)>) -> TypeExpr {
        TypeExpr::Object(ObjectExpr {
            key_values: fields
                .into_iter()
                .map(|(key, value)| KeyValue {
                    key: key.to_string(),
                    value,
                    optional: false,
                })
                .collect(),
            label: None,
            optional: false,
            open: false,
            brand: "Object".to_string(),
        })
    }

    pub fn union(members: Vec<TypeExpr>) -> TypeExpr {
        TypeExpr::Union(UnionExpr {
            unions: members,
            label: None,
            optional: false,
        })
    }

    pub fn intersection(members: Vec<TypeExpr>) -> TypeExpr {
        TypeExpr::Intersection(IntersectionExpr {
            intersections: members,
            label: None,
            optional: false,
        })
    }

    pub fn generic(base: TypeExpr, args: Vec<TypeExpr>) -> TypeExpr {
        TypeExpr::Generic(GenericExpr {
            value: Box::new(base),
            generics: args,
            label: None,
        })
    }

    pub fn tuple(values: Vec<TypeExpr>) -> TypeExpr {
        TypeExpr::Tuple(TupleExpr {
            values,
            label: None,
            optional: false,
        })
    }

    pub fn renamed(name: &str, original: TypeExpr) -> TypeExpr {
        TypeExpr::Renamed(RenamedExpr {
            name: name.to_string(),
            builtin: false,
            original: Box::new(original),
            label: None,
            optional: false,
        })
    }

    pub fn function(args: Vec<TypeExpr>, result: TypeExpr) -> TypeExpr {
        TypeExpr::Function(FunctionExpr {
            args,
            result: Box::new(result),
            this_arg: None,
            label: None,
            optional: false,
            generics: Vec::new(),
            brand: "Object".to_string(),
        })
    }

    pub fn method(this_arg: TypeExpr, args: Vec<TypeExpr>, result: TypeExpr) -> TypeExpr {
        match function(args, result) {
            TypeExpr::Function(mut f) => {
                f.this_arg = Some(Box::new(this_arg));
                TypeExpr::Function(f)
            }
            other => other,
        }
    }

    /// Attach generic descriptors: `(name, location)` per occurrence.
    pub fn with_generics(
        mut expr: TypeExpr,
        generics: Vec<(&str, Vec<LocationSegment>)>,
    ) -> TypeExpr {
        if let TypeExpr::Function(f) = &mut expr {
            f.generics = generics
                .into_iter()
                .map(|(name, location)| GenericDescriptor {
                    name: name.to_string(),
                    location,
                })
                .collect();
        }
        expr
    }

    pub fn assignment(identifier: &str, type_expression: TypeExpr) -> TypeStatement {
        TypeStatement::Assignment {
            identifier: identifier.to_string(),
            type_expression,
        }
    }

    pub fn declaration(identifier: &str, generics: &[&str], type_expression: TypeExpr) -> TypeStatement {
        TypeStatement::TypeDeclaration {
            identifier: identifier.to_string(),
            type_expression,
            generics: generics.iter().map(|g| literal(g)).collect(),
        }
    }

    pub fn import(dependency: &str, types: Vec<TypeExpr>) -> TypeStatement {
        TypeStatement::Import {
            dependency: dependency.to_string(),
            types,
        }
    }

    pub fn program(statements: Vec<TypeStatement>) -> TypeProgram {
        TypeProgram { statements }
    }
}
