//! End-to-end coverage of `lispy::parse`/`lispy::check`, exercising the
//! documented concrete scenarios and universal properties.
use lispy::typecheck::Type;

fn int() -> Type {
    Type::Int
}

fn float() -> Type {
    Type::Float
}

fn list(elem: Type) -> Type {
    Type::List(Box::new(elem))
}

#[test]
fn homogeneous_list_of_ints_checks() {
    let types = lispy::check("(list 1 2 3)").unwrap();
    assert_eq!(types, vec![list(int())]);
}

#[test]
fn heterogeneous_list_is_rejected() {
    assert!(lispy::check("(list 1 false)").is_err());
}

#[test]
fn lambda_with_annotated_parameters_checks() {
    let types = lispy::check("(lambda ((x int) (y float)) (list 1 2 3))").unwrap();
    assert_eq!(types, vec![Type::Function(vec![int(), float()], Box::new(list(int())))]);
}

#[test]
fn immediately_applied_lambda_checks() {
    let types = lispy::check("((lambda ((x int)) x) 1)").unwrap();
    assert_eq!(types, vec![int()]);
}

#[test]
fn set_within_let_matching_type_checks() {
    let types = lispy::check("(let ((a 1) (b 2.0)) (set a 2) a)").unwrap();
    assert_eq!(types, vec![int()]);
}

#[test]
fn set_within_let_mismatched_type_is_rejected() {
    assert!(lispy::check("(let ((a 1) (b 2.0)) (set a 3.0) a)").is_err());
}

#[test]
fn cond_with_matching_branch_and_default_types_checks() {
    let types = lispy::check("(cond (true 7) (false -1) 9)").unwrap();
    assert_eq!(types, vec![int()]);
}

#[test]
fn cond_with_mismatched_branch_value_is_rejected() {
    assert!(lispy::check("(cond (true 1.0) (false -1) 9)").is_err());
}

#[test]
fn cons_onto_nil_checks() {
    let types = lispy::check("(cons 1 nil)").unwrap();
    assert_eq!(types, vec![list(int())]);
}

#[test]
fn car_of_empty_list_is_unconstrained() {
    let types = lispy::check("(car ())").unwrap();
    assert!(matches!(types[0], Type::Unknown(_)));
}

#[test]
fn duplicate_lambda_parameter_name_is_rejected() {
    assert!(lispy::check("(lambda ((x int) (x int)) 1)").is_err());
}

#[test]
fn set_of_special_form_name_is_rejected() {
    assert!(lispy::check("(set lambda 1)").is_err());
}

#[test]
fn define_introduces_a_new_top_level_binding() {
    let types = lispy::check("(define inc ((x int)) (list x 1))").unwrap();
    assert_eq!(
        types,
        vec![Type::Function(vec![int()], Box::new(list(int())))]
    );
}

#[test]
fn top_level_define_persists_across_later_forms() {
    // Unlike `set`, `define` does not require the name to already be bound,
    // which is what lets later top-level forms refer back to it.
    let types = lispy::check("(define id ((x int)) x) (id 1)").unwrap();
    assert_eq!(types[1], int());
}

#[test]
fn top_level_set_without_a_prior_define_is_unbound() {
    assert!(lispy::check("(set x 1)").is_err());
}

#[test]
fn redefining_with_a_mismatched_type_is_rejected() {
    assert!(lispy::check("(define f ((x int)) x) (define f ((x float)) x)").is_err());
}

#[test]
fn parse_is_deterministic_up_to_source_locations() {
    let source = "(lambda ((x int)) (list x 1 2))";
    assert_eq!(lispy::parse(source).unwrap(), lispy::parse(source).unwrap());
}

#[test]
fn check_is_deterministic() {
    let source = "(let ((a 1) (b 2.0)) (list a a))";
    assert_eq!(lispy::check(source).unwrap(), lispy::check(source).unwrap());
}

#[test]
fn nil_occurrences_are_independently_fresh() {
    // Two unrelated top-level `nil`s must not share a type variable: one
    // resolving to `List(Int)` must not force the other towards `Bool`.
    let types = lispy::check("(cons 1 nil) (cons true nil)").unwrap();
    assert_eq!(types, vec![list(int()), list(Type::Bool)]);
}

#[test]
fn let_bindings_cannot_see_their_siblings() {
    assert!(lispy::check("(let ((a 1) (b a)) b)").is_err());
}

#[test]
fn nested_let_shadowing_does_not_leak_into_outer_scope() {
    let types = lispy::check("(let ((a 1)) (progn (let ((a 2.0)) a) a))").unwrap();
    assert_eq!(types, vec![int()]);
}

#[test]
fn unbound_variable_is_rejected() {
    assert!(lispy::check("x").is_err());
}

#[test]
fn malformed_type_annotation_is_rejected() {
    assert!(lispy::check("(lambda ((x string)) x)").is_err());
}

#[test]
fn cond_without_branches_is_a_syntax_error() {
    assert!(lispy::check("(cond 1 2)").is_err());
}
