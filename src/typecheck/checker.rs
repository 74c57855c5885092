//! Recursive type inference over AST form terms, grounded on
//! `lispyc.typechecker.checker.TypeChecker`.
use crate::ast::form::{ConstantValue, Form, FormKind};
use crate::error::{BindingError, LispyError, TypeCheckError};
use crate::span::Span;
use crate::typecheck::scope::Scope;
use crate::typecheck::types::{Type, UnknownIdGen};
use crate::typecheck::unifier::Unifier;

/// The name reserved for the empty, element-type-polymorphic list.
const NIL: &str = "nil";

/// Checks an entire program and exposes the resolved type of each top-level
/// form. One `TypeChecker` owns the single `Unifier` substitution shared by
/// every form in the program.
pub struct TypeChecker {
    unifier: Unifier,
    unknowns: UnknownIdGen,
}

impl TypeChecker {
    pub fn new() -> Self {
        Self {
            unifier: Unifier::new(),
            unknowns: UnknownIdGen::default(),
        }
    }

    fn fresh(&mut self) -> Type {
        Type::Unknown(self.unknowns.fresh())
    }

    pub fn check_program(&mut self, forms: &[Form]) -> Result<Vec<Type>, LispyError> {
        let mut scope = Scope::new();
        let mut results = Vec::with_capacity(forms.len());
        for form in forms {
            let ty = self.check_form(form, &mut scope)?;
            let resolved = self.unifier.resolve(ty);
            log::debug!("top-level form resolved to {resolved}");
            results.push(resolved);
        }
        Ok(results)
    }

    fn check_form(&mut self, form: &Form, scope: &mut Scope) -> Result<Type, LispyError> {
        match &form.kind {
            FormKind::Constant(value) => Ok(self.check_constant(value)),
            FormKind::Variable(name) => self.check_variable(name, form.span, scope),
            FormKind::ComposedForm { head, args } => {
                self.check_composed_form(head, args, form.span, scope)
            }
            FormKind::Lambda { parameters, body } => self.check_lambda(parameters, body, scope),
            FormKind::Define {
                name,
                parameters,
                body,
            } => self.check_define(name, parameters, body, form.span, scope),
            FormKind::List(elements) => self.check_list(elements, form.span, scope),
            FormKind::Cons { car, cdr } => self.check_cons(car, cdr, scope),
            FormKind::Car(list) => self.check_car(list, scope),
            FormKind::Cdr(list) => self.check_cdr(list, scope),
            FormKind::Progn(forms) => self.check_progn(forms, scope),
            FormKind::Set { name, value } => self.check_set(name, value, form.span, scope),
            FormKind::Let { bindings, body } => self.check_let(bindings, body, scope),
            FormKind::Cond { branches, default } => {
                self.check_cond(branches, default, form.span, scope)
            }
            FormKind::Select {
                value,
                branches,
                default,
            } => self.check_select(value, branches, default, scope),
        }
    }

    fn check_constant(&self, value: &ConstantValue) -> Type {
        match value {
            ConstantValue::Int(_) => Type::Int,
            ConstantValue::Float(_) => Type::Float,
            ConstantValue::Bool(_) => Type::Bool,
        }
    }

    fn check_variable(&mut self, name: &str, span: Span, scope: &Scope) -> Result<Type, LispyError> {
        if name == NIL {
            // Every occurrence of `nil` gets its own fresh element type, so
            // that e.g. `(cons 1 nil)` and `(cons true nil)` don't unify
            // with each other through a shared `nil` type.
            return Ok(Type::List(Box::new(self.fresh())));
        }
        scope
            .lookup(name)
            .cloned()
            .ok_or_else(|| BindingError::UnboundName {
                name: name.to_owned(),
                span,
            }.into())
    }

    fn check_composed_form(
        &mut self,
        head: &Form,
        args: &[Form],
        span: Span,
        scope: &mut Scope,
    ) -> Result<Type, LispyError> {
        let arg_types = args
            .iter()
            .map(|a| self.check_form(a, scope))
            .collect::<Result<Vec<_>, _>>()?;
        let ret = self.fresh();
        let head_type = self.check_form(head, scope)?;
        self.unifier
            .unify(head_type, Type::Function(arg_types, Box::new(ret.clone())), span)?;
        Ok(ret)
    }

    fn check_lambda(&mut self, parameters: &[crate::ast::form::Param], body: &Form, scope: &Scope) -> Result<Type, LispyError> {
        let mut inner = scope.clone();
        for p in parameters {
            inner.bind(p.name.clone(), p.ty.clone());
        }
        let ret = self.check_form(body, &mut inner)?;
        Ok(Type::Function(
            parameters.iter().map(|p| p.ty.clone()).collect(),
            Box::new(ret),
        ))
    }

    /// `(define name params body)` is sugar for `(set name (lambda params
    /// body))`, except the name need not already be bound: it is created if
    /// absent, or unified against its previous type and overwritten if
    /// present. This is what lets top-level bindings accumulate across a
    /// program's forms.
    fn check_define(
        &mut self,
        name: &str,
        parameters: &[crate::ast::form::Param],
        body: &Form,
        span: Span,
        scope: &mut Scope,
    ) -> Result<Type, LispyError> {
        self.assert_name_bindable(name, span)?;
        let function_type = self.check_lambda(parameters, body, scope)?;
        if let Some(existing) = scope.lookup(name).cloned() {
            self.unifier.unify(existing, function_type.clone(), span)?;
        }
        scope.bind(name.to_owned(), function_type.clone());
        Ok(function_type)
    }

    fn check_list(&mut self, elements: &[Form], span: Span, scope: &mut Scope) -> Result<Type, LispyError> {
        let mut iter = elements.iter();
        let Some(first) = iter.next() else {
            return Ok(Type::List(Box::new(self.fresh())));
        };

        let first_type = self.check_form(first, scope)?;
        for (index, element) in elements.iter().enumerate().skip(1) {
            let current_type = self.check_form(element, scope)?;
            self.unifier
                .unify(first_type.clone(), current_type.clone(), element.span)
                .map_err(|_| {
                    TypeCheckError::semantic(
                        format!(
                            "List is not homogeneous: expected {} but got {} for element {index}",
                            self.unifier.resolve(first_type.clone()),
                            self.unifier.resolve(current_type.clone()),
                        ),
                        span,
                    )
                })?;
        }

        Ok(Type::List(Box::new(first_type)))
    }

    fn check_cons(&mut self, car: &Form, cdr: &Form, scope: &mut Scope) -> Result<Type, LispyError> {
        let car_type = self.check_form(car, scope)?;
        let cdr_type = self.check_form(cdr, scope)?;
        let element_type = self.fresh();
        self.unifier
            .unify(cdr_type, Type::List(Box::new(element_type.clone())), cdr.span)?;
        self.unifier.unify(car_type, element_type.clone(), car.span)?;
        Ok(Type::List(Box::new(element_type)))
    }

    fn check_car(&mut self, list: &Form, scope: &mut Scope) -> Result<Type, LispyError> {
        let list_type = self.check_form(list, scope)?;
        let element_type = self.fresh();
        self.unifier
            .unify(list_type, Type::List(Box::new(element_type.clone())), list.span)?;
        Ok(element_type)
    }

    fn check_cdr(&mut self, list: &Form, scope: &mut Scope) -> Result<Type, LispyError> {
        let list_type = self.check_form(list, scope)?;
        let element_type = self.fresh();
        self.unifier
            .unify(list_type, Type::List(Box::new(element_type.clone())), list.span)?;
        Ok(Type::List(Box::new(element_type)))
    }

    fn check_progn(&mut self, forms: &[Form], scope: &mut Scope) -> Result<Type, LispyError> {
        let mut last = None;
        for form in forms {
            last = Some(self.check_form(form, scope)?);
        }
        Ok(last.expect("the parser never builds a progn with fewer than two forms"))
    }

    fn check_set(&mut self, name: &str, value: &Form, span: Span, scope: &mut Scope) -> Result<Type, LispyError> {
        self.assert_name_bindable(name, span)?;
        let existing = scope
            .lookup(name)
            .cloned()
            .ok_or_else(|| BindingError::UnboundName {
                name: name.to_owned(),
                span,
            })?;
        let value_type = self.check_form(value, scope)?;
        self.unifier.unify(existing, value_type.clone(), span)?;
        Ok(value_type)
    }

    fn check_let(&mut self, bindings: &[(String, Form)], body: &[Form], scope: &mut Scope) -> Result<Type, LispyError> {
        // Every binding's value is checked under the *outer* scope, so that
        // `(let ((a 1) (b a)) ...)` cannot see its own sibling bindings; all
        // names are then introduced at once into a single nested scope.
        let mut evaluated = Vec::with_capacity(bindings.len());
        for (name, value) in bindings {
            self.assert_name_bindable(name, value.span)?;
            let ty = self.check_form(value, scope)?;
            evaluated.push((name.clone(), ty));
        }

        let mut inner = scope.clone();
        for (name, ty) in evaluated {
            inner.bind(name, ty);
        }

        self.check_progn(body, &mut inner)
    }

    fn check_cond(&mut self, branches: &[(Form, Form)], default: &Form, span: Span, scope: &mut Scope) -> Result<Type, LispyError> {
        let (first_predicate, first_value) = branches
            .first()
            .expect("the parser never builds a cond with no branches");
        let predicate_type = self.check_form(first_predicate, scope)?;
        self.unifier
            .unify(predicate_type, Type::Bool, first_predicate.span)?;
        let value_type = self.check_form(first_value, scope)?;

        for (predicate, value) in &branches[1..] {
            let predicate_type = self.check_form(predicate, scope)?;
            self.unifier.unify(predicate_type, Type::Bool, predicate.span)?;
            let current_value_type = self.check_form(value, scope)?;
            self.unifier
                .unify(value_type.clone(), current_value_type, value.span)?;
        }

        let default_type = self.check_form(default, scope)?;
        self.unifier.unify(value_type.clone(), default_type, default.span)?;
        Ok(value_type)
    }

    fn check_select(
        &mut self,
        value: &Form,
        branches: &[(Form, Form)],
        default: &Form,
        scope: &mut Scope,
    ) -> Result<Type, LispyError> {
        let key_type = self.check_form(value, scope)?;
        for (predicate, _) in branches {
            let predicate_type = self.check_form(predicate, scope)?;
            self.unifier.unify(key_type.clone(), predicate_type, predicate.span)?;
        }

        let default_type = self.check_form(default, scope)?;
        for (_, branch_value) in branches {
            let branch_value_type = self.check_form(branch_value, scope)?;
            self.unifier
                .unify(default_type.clone(), branch_value_type, branch_value.span)?;
        }

        Ok(default_type)
    }

    fn assert_name_bindable(&self, name: &str, span: Span) -> Result<(), LispyError> {
        if name == NIL || crate::ast::is_special_form(name) {
            return Err(BindingError::InvalidName {
                name: name.to_owned(),
                span,
            }.into());
        }
        Ok(())
    }
}

impl Default for TypeChecker {
    fn default() -> Self {
        Self::new()
    }
}
