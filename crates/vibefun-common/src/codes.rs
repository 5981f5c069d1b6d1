//! The static diagnostic catalog.
//!
//! One entry per VFxxxx code: message/hint templates, a prose explanation,
//! and a bad/good example pair. The doc generator and the CLI `explain`
//! command render documentation from this data; the compiler itself only
//! interpolates the templates.

use crate::diagnostic::{DiagnosticDefinition, Example, Phase, Severity};

const fn ex(bad: &'static str, good: &'static str, description: &'static str) -> Example {
    Example {
        bad,
        good,
        description,
    }
}

#[allow(clippy::too_many_arguments)]
const fn def(
    code: &'static str,
    title: &'static str,
    severity: Severity,
    phase: Phase,
    category: &'static str,
    message_template: &'static str,
    hint_template: Option<&'static str>,
    explanation: &'static str,
    example: Example,
) -> DiagnosticDefinition {
    DiagnosticDefinition {
        code,
        title,
        severity,
        phase,
        category,
        message_template,
        hint_template,
        explanation,
        example,
        related_codes: &[],
        see_also: &[],
    }
}

const fn related(
    mut d: DiagnosticDefinition,
    codes: &'static [&'static str],
) -> DiagnosticDefinition {
    d.related_codes = codes;
    d
}

use Phase::{Desugarer, Lexer, Modules, Parser, Typechecker};
use Severity::{Error, Warning};

pub(crate) const CATALOG: &[DiagnosticDefinition] = &[
    // ── Lexer ───────────────────────────────────────────────────────────
    def(
        "VF1001", "Unexpected character", Error, Lexer, "lexical",
        "unexpected character `{char}`",
        None,
        "The lexer encountered a character that cannot start any token.",
        ex("let x = 1 § 2", "let x = 1 + 2", "Remove the stray character."),
    ),
    def(
        "VF1002", "Unterminated string", Error, Lexer, "lexical",
        "unterminated string literal",
        Some("add a closing `\"` before the end of the line"),
        "A string literal was opened but never closed.",
        ex("let s = \"hello", "let s = \"hello\"", "Close the string."),
    ),
    def(
        "VF1003", "Invalid escape sequence", Error, Lexer, "lexical",
        "invalid escape sequence `\\{escape}`",
        None,
        "Only \\n, \\t, \\r, \\\\, \\\" and unicode escapes are recognized inside strings.",
        ex("let s = \"a\\q\"", "let s = \"a\\n\"", "Use a supported escape."),
    ),
    def(
        "VF1004", "Unterminated block comment", Error, Lexer, "lexical",
        "unterminated block comment",
        None,
        "A block comment was opened but never closed before the end of the file.",
        ex("/* comment", "/* comment */", "Close the comment."),
    ),
    def(
        "VF1005", "Invalid number literal", Error, Lexer, "lexical",
        "invalid number literal `{literal}`",
        None,
        "The characters form a malformed number.",
        ex("let n = 12abc", "let n = 12", "Remove the trailing letters."),
    ),
    def(
        "VF1006", "Integer out of range", Error, Lexer, "lexical",
        "integer literal `{literal}` does not fit in 64 bits",
        None,
        "Integer literals must fit in a signed 64-bit integer.",
        ex("let n = 99999999999999999999", "let n = 9999999999", "Use a smaller value."),
    ),
    def(
        "VF1007", "Invalid unicode escape", Error, Lexer, "lexical",
        "invalid unicode escape `{escape}`",
        None,
        "Unicode escapes are written `\\u{...}` with one to six hex digits naming a valid scalar value.",
        ex("let s = \"\\u{}\"", "let s = \"\\u{1F600}\"", "Provide hex digits."),
    ),
    def(
        "VF1008", "Unterminated interpolation", Error, Lexer, "lexical",
        "unterminated string interpolation",
        None,
        "A `${` interpolation inside a string was never closed with `}`.",
        ex("let s = \"${name\"", "let s = \"${name}\"", "Close the interpolation."),
    ),
    def(
        "VF1009", "Unexpected end of input", Error, Lexer, "lexical",
        "unexpected end of input",
        None,
        "The file ended in the middle of a token.",
        ex("let s = \"", "let s = \"\"", "Complete the token."),
    ),
    def(
        "VF1010", "Invalid operator", Error, Lexer, "lexical",
        "`{operator}` is not a valid operator",
        None,
        "The character sequence does not form any operator of the language.",
        ex("let b = a =! b", "let b = a != b", "Use a defined operator."),
    ),
    def(
        "VF1011", "Reserved word", Error, Lexer, "lexical",
        "`{word}` is a reserved word",
        None,
        "The name is reserved for future use and cannot be used as an identifier.",
        ex("let effect = 1", "let effects = 1", "Pick a different name."),
    ),
    def(
        "VF1012", "Invalid byte", Error, Lexer, "lexical",
        "invalid byte 0x{byte} in source",
        None,
        "The source contains a byte that is not part of any valid token.",
        ex("let x = 1 \u{0007}", "let x = 1", "Remove the control byte."),
    ),
    def(
        "VF1100", "Invalid float literal", Error, Lexer, "numbers",
        "invalid float literal `{literal}`",
        None,
        "Float literals need digits on both sides of the decimal point.",
        ex("let f = 1.", "let f = 1.0", "Write the fractional part."),
    ),
    def(
        "VF1101", "Leading zero", Error, Lexer, "numbers",
        "integer literals may not have leading zeros",
        None,
        "A leading zero would suggest octal, which the language does not infer silently.",
        ex("let n = 012", "let n = 12", "Drop the leading zero."),
    ),
    def(
        "VF1102", "Invalid hex literal", Error, Lexer, "numbers",
        "invalid hexadecimal literal `{literal}`",
        None,
        "Hex literals are `0x` followed by at least one hex digit.",
        ex("let n = 0x", "let n = 0xFF", "Add the digits."),
    ),
    def(
        "VF1103", "Invalid binary literal", Error, Lexer, "numbers",
        "invalid binary literal `{literal}`",
        None,
        "Binary literals are `0b` followed by at least one of `0` or `1`.",
        ex("let n = 0b", "let n = 0b1010", "Add the digits."),
    ),
    def(
        "VF1104", "Invalid octal literal", Error, Lexer, "numbers",
        "invalid octal literal `{literal}`",
        None,
        "Octal literals are `0o` followed by at least one digit in 0-7.",
        ex("let n = 0o9", "let n = 0o17", "Use octal digits."),
    ),
    def(
        "VF1300", "Comment nesting too deep", Error, Lexer, "lexical",
        "block comments nest deeper than {limit} levels",
        None,
        "Nested block comments are supported up to a fixed depth.",
        ex("/* /* /* ... */ */ */", "/* one level */", "Flatten the comments."),
    ),
    def(
        "VF1400", "Source is not UTF-8", Error, Lexer, "encoding",
        "source file is not valid UTF-8",
        None,
        "Source files must be UTF-8 encoded.",
        ex("<latin-1 bytes>", "<utf-8 bytes>", "Re-encode the file as UTF-8."),
    ),
    // ── Parser ──────────────────────────────────────────────────────────
    def(
        "VF2001", "Unexpected token", Error, Parser, "syntax",
        "unexpected token `{token}`",
        Some("expected {expected}"),
        "The parser found a token that cannot appear at this position.",
        ex("let x = = 1", "let x = 1", "Remove the duplicated token."),
    ),
    def(
        "VF2010", "Expected expression", Error, Parser, "syntax",
        "expected an expression, found `{token}`",
        None,
        "An expression is required here.",
        ex("let x =", "let x = 1", "Provide the right-hand side."),
    ),
    def(
        "VF2011", "Expected pattern", Error, Parser, "syntax",
        "expected a pattern, found `{token}`",
        None,
        "A pattern is required on the left of a match arm.",
        ex("match x { => 1 }", "match x { _ => 1 }", "Write a pattern."),
    ),
    def(
        "VF2100", "Expected declaration", Error, Parser, "syntax",
        "expected a declaration, found `{token}`",
        None,
        "Only declarations may appear at the top level of a module.",
        ex(") let x = 1", "let x = 1", "Remove the stray token."),
    ),
    def(
        "VF2101", "Expected identifier", Error, Parser, "syntax",
        "expected an identifier, found `{token}`",
        None,
        "A name is required at this position.",
        ex("let 1 = 2", "let one = 2", "Use an identifier."),
    ),
    def(
        "VF2102", "Expected type", Error, Parser, "syntax",
        "expected a type, found `{token}`",
        None,
        "A type expression is required after `:`.",
        ex("let x: = 1", "let x: Int = 1", "Write the type."),
    ),
    def(
        "VF2103", "Unclosed delimiter", Error, Parser, "syntax",
        "unclosed `{delimiter}`",
        None,
        "An opening bracket has no matching closing bracket.",
        ex("let t = (1, 2", "let t = (1, 2)", "Close the delimiter."),
    ),
    def(
        "VF2104", "Invalid import item", Error, Parser, "imports",
        "invalid item in import list",
        None,
        "Import lists contain names, optionally with `type` prefixes and `as` aliases.",
        ex("import { 1 } from \"./a\"", "import { one } from \"./a\"", "Import a name."),
    ),
    def(
        "VF2105", "Duplicate record field", Error, Parser, "records",
        "duplicate field `{field}` in record literal",
        None,
        "A record literal may list each field at most once.",
        ex("{ x: 1, x: 2 }", "{ x: 2 }", "Keep one occurrence."),
    ),
    def(
        "VF2200", "Invalid top-level expression", Error, Parser, "syntax",
        "expressions are not allowed at the top level",
        None,
        "Top-level code must be a declaration; wrap expressions in a `let`.",
        ex("1 + 2", "let three = 1 + 2", "Bind the expression."),
    ),
    def(
        "VF2300", "Misplaced export", Error, Parser, "imports",
        "`export` is only allowed at the top level of a module",
        None,
        "Exports cannot appear inside expressions or nested scopes.",
        ex("let f = () -> export { x }", "export { x }", "Move the export to the top level."),
    ),
    def(
        "VF2400", "Invalid pattern", Error, Parser, "patterns",
        "this form is not valid in a pattern",
        None,
        "Patterns are wildcards, names, literals, constructors, records, and tuples.",
        ex("match x { 1 + 2 => 0 }", "match x { 3 => 0 }", "Use a literal pattern."),
    ),
    def(
        "VF2401", "Invalid guard", Error, Parser, "patterns",
        "a match guard must be a single expression",
        None,
        "Guards are written `if expr` after the pattern.",
        ex("match x { n if => 0 }", "match x { n if n > 0 => 0 }", "Complete the guard."),
    ),
    def(
        "VF2402", "Or-pattern binding mismatch", Error, Parser, "patterns",
        "alternatives of an or-pattern must bind the same names",
        None,
        "Every alternative of `p1 | p2` must bind exactly the same variables.",
        ex("Some(x) | None => x", "Some(x) | None => 0", "Make the bindings agree."),
    ),
    def(
        "VF2500", "Expression too deeply nested", Error, Parser, "limits",
        "expression nesting exceeds {limit} levels",
        None,
        "The parser bounds expression depth to protect its stack.",
        ex("((((((...))))))", "a flatter expression", "Restructure the expression."),
    ),
    // ── Desugarer ───────────────────────────────────────────────────────
    def(
        "VF3101", "Invalid record spread", Error, Desugarer, "records",
        "`...` spread is only allowed inside a record literal",
        None,
        "Spread syntax copies fields from another record and has no meaning elsewhere.",
        ex("let x = ...r", "let x = { ...r }", "Spread inside a record."),
    ),
    // ── Type checker: contextual mismatches ─────────────────────────────
    related(def(
        "VF4001", "Type mismatch", Error, Typechecker, "mismatch",
        "expected `{expected}`, found `{found}`",
        None,
        "Two uses of the same value require incompatible types.",
        ex(
            "let r = ref(None)\nmatch r! { Some(1) => 1, None => 0 }\nmatch r! { Some(\"a\") => 1, None => 0 }",
            "let r = ref(None)\nmatch r! { Some(1) => 1, None => 0 }\nmatch r! { Some(2) => 1, None => 0 }",
            "A non-generalized binding is fixed to one type by its first use.",
        ),
    ), &["VF4024"]),
    def(
        "VF4002", "Match arms differ", Error, Typechecker, "mismatch",
        "this match arm has type `{found}`, but previous arms have type `{expected}`",
        None,
        "Every arm of a match must produce the same type.",
        ex(
            "match b { true => 1, false => \"no\" }",
            "match b { true => 1, false => 0 }",
            "Make the arm results agree.",
        ),
    ),
    def(
        "VF4003", "Pattern type mismatch", Error, Typechecker, "patterns",
        "pattern expects `{expected}`, but the scrutinee has type `{found}`",
        None,
        "A pattern can only match values of the scrutinee's type.",
        ex(
            "match 1 { Some(x) => x, None => 0 }",
            "match Some(1) { Some(x) => x, None => 0 }",
            "Match the pattern against the right type of value.",
        ),
    ),
    def(
        "VF4004", "Annotation mismatch", Error, Typechecker, "mismatch",
        "expression has type `{found}`, but is annotated as `{expected}`",
        None,
        "The inferred type of the expression contradicts its annotation.",
        ex("let x: Int = \"hi\"", "let x: String = \"hi\"", "Fix the annotation or the value."),
    ),
    def(
        "VF4005", "Argument type mismatch", Error, Typechecker, "application",
        "argument has type `{found}`, but the function expects `{expected}`",
        None,
        "The argument's type does not match the function's parameter type.",
        ex("let n = not(1)", "let n = not(true)", "Pass a value of the expected type."),
    ),
    def(
        "VF4006", "Operand type mismatch", Error, Typechecker, "operators",
        "operands of `{op}` must have the same type: `{left}` vs `{right}`",
        None,
        "Equality and comparison operators require both operands at one type.",
        ex("1 == \"1\"", "1 == 1", "Compare values of the same type."),
    ),
    def(
        "VF4007", "Numeric operand required", Error, Typechecker, "operators",
        "`{op}` requires numeric operands, found `{found}`",
        None,
        "Arithmetic and ordering operators work on `Int` or `Float`.",
        ex("\"a\" + \"b\"", "\"a\" & \"b\"", "Use `&` for string concatenation."),
    ),
    related(def(
        "VF4008", "Mixed numeric operands", Error, Typechecker, "operators",
        "`{op}` cannot mix `Int` and `Float`",
        Some("convert one side with `toFloat` or `toInt`"),
        "Arithmetic never converts implicitly between `Int` and `Float`.",
        ex("1 + 2.0", "toFloat(1) + 2.0", "Convert explicitly."),
    ), &["VF4007"]),
    def(
        "VF4009", "Logical operand not Bool", Error, Typechecker, "operators",
        "`{op}` requires `Bool` operands, found `{found}`",
        None,
        "`&&` and `||` are defined on booleans only.",
        ex("1 && true", "(1 > 0) && true", "Produce a `Bool` first."),
    ),
    def(
        "VF4010", "Concat operand not String", Error, Typechecker, "operators",
        "`&` requires `String` operands, found `{found}`",
        Some("use `toString` to convert"),
        "String concatenation does not stringify its operands implicitly.",
        ex("\"n = \" & 1", "\"n = \" & toString(1)", "Convert to `String` first."),
    ),
    def(
        "VF4011", "Cons element mismatch", Error, Typechecker, "operators",
        "cannot cons `{found}` onto `{expected}`",
        None,
        "`::` prepends an element to a list of the same element type.",
        ex("\"a\" :: [1, 2]", "0 :: [1, 2]", "Cons an element of the list's type."),
    ),
    def(
        "VF4012", "Assignment type mismatch", Error, Typechecker, "refs",
        "cannot assign `{found}` to a `Ref<{expected}>`",
        None,
        "`:=` stores a value of the reference cell's element type.",
        ex("let mutable n = 1\nn := \"x\"", "let mutable n = 1\nn := 2", "Store the cell's type."),
    ),
    def(
        "VF4013", "Spread of non-record", Error, Typechecker, "records",
        "only records can be spread, found `{found}`",
        None,
        "`...e` inside a record literal copies the fields of a record value.",
        ex("{ ...1, x: 2 }", "{ ...point, x: 2 }", "Spread a record value."),
    ),
    def(
        "VF4014", "Negation of non-number", Error, Typechecker, "operators",
        "unary `-` requires a numeric operand, found `{found}`",
        None,
        "Negation is defined on `Int` and `Float`.",
        ex("-\"x\"", "-1", "Negate a number."),
    ),
    def(
        "VF4015", "Logical not of non-Bool", Error, Typechecker, "operators",
        "`not` requires a `Bool` operand, found `{found}`",
        None,
        "Logical negation is defined on booleans only.",
        ex("not(1)", "not(1 > 0)", "Produce a `Bool` first."),
    ),
    def(
        "VF4016", "Recursive binding mismatch", Error, Typechecker, "mismatch",
        "recursive binding `{name}` is used at type `{expected}` but defined at type `{found}`",
        None,
        "A recursive binding's uses inside its own definition must agree with the definition.",
        ex(
            "let rec f = (x) -> f(x) + f",
            "let rec f = (x) -> f(x) + 1",
            "Use the binding consistently.",
        ),
    ),
    // ── Type checker: unification ───────────────────────────────────────
    def(
        "VF4020", "Union type mismatch", Error, Typechecker, "unification",
        "cannot unify union type `{left}` with `{right}`",
        None,
        "Union types unify only with identical unions or with a member variant; primitive unions never narrow.",
        ex("let x: Int | String = 1\nx + 1", "let x: Int = 1\nx + 1", "Avoid primitive unions at usage sites."),
    ),
    def(
        "VF4021", "Function arity mismatch", Error, Typechecker, "unification",
        "function types differ in arity: {expected} vs {found}",
        None,
        "Two function types can only unify parameter-for-parameter.",
        ex("let f: (Int) -> Int = (a, b) -> a", "let f: (Int) -> Int = (a) -> a", "Match the arity."),
    ),
    def(
        "VF4022", "Type argument arity mismatch", Error, Typechecker, "unification",
        "type constructors differ in argument count: {expected} vs {found}",
        None,
        "Applications of a type constructor unify argument-for-argument.",
        ex("let x: Result<Int> = Ok(1)", "let x: Result<Int, String> = Ok(1)", "Supply every type argument."),
    ),
    def(
        "VF4023", "Tuple arity mismatch", Error, Typechecker, "unification",
        "tuple types differ in length: {expected} vs {found}",
        None,
        "Tuples unify element-for-element and must have the same length.",
        ex("let p: (Int, Int) = (1, 2, 3)", "let p: (Int, Int, Int) = (1, 2, 3)", "Match the lengths."),
    ),
    def(
        "VF4024", "Cannot unify types", Error, Typechecker, "unification",
        "expected `{expected}`, found `{found}`",
        None,
        "The two types have incompatible shapes and no substitution can make them equal.",
        ex("1 + \"x\"", "1 + 2", "Use compatible types."),
    ),
    def(
        "VF4025", "Variant type mismatch", Error, Typechecker, "unification",
        "`{expected}` and `{found}` are distinct variant types",
        Some("variant types are nominal; two identical declarations are still different types"),
        "Variant identity is the declared name, not the constructor list.",
        ex(
            "type A = X | Y\ntype B = X | Y\nlet a: A = (b: B)",
            "type A = X | Y\nlet a: A = X",
            "Construct the declared type.",
        ),
    ),
    // ── Type checker: name resolution ───────────────────────────────────
    def(
        "VF4100", "Unbound variable", Error, Typechecker, "name-resolution",
        "`{name}` is not defined",
        Some("did you mean `{suggestion}`?"),
        "The name is not bound in the current scope, by any import, or by the standard library.",
        ex("let y = lenght(xs)", "let y = length(xs)", "Fix the spelling."),
    ),
    def(
        "VF4101", "Unknown type", Error, Typechecker, "name-resolution",
        "type `{name}` is not defined",
        Some("did you mean `{suggestion}`?"),
        "The annotation names a type that is not declared or imported.",
        ex("let x: Itn = 1", "let x: Int = 1", "Fix the spelling."),
    ),
    def(
        "VF4102", "Duplicate definition", Error, Typechecker, "name-resolution",
        "`{name}` is defined more than once in this module",
        None,
        "Each top-level type name may be declared once per module.",
        ex("type T = A\ntype T = B", "type T = A\ntype U = B", "Rename one declaration."),
    ),
    def(
        "VF4103", "Wrong number of type arguments", Error, Typechecker, "name-resolution",
        "`{name}` expects {expected} type arguments, found {found}",
        None,
        "Type constructors are applied to exactly their declared number of arguments.",
        ex("let x: Option = None", "let x: Option<Int> = None", "Supply the type argument."),
    ),
    // ── Type checker: application ───────────────────────────────────────
    def(
        "VF4200", "Constructor arity mismatch", Error, Typechecker, "variants",
        "constructor `{ctor}` expects {expected} arguments, found {found}",
        None,
        "A variant constructor takes exactly the arguments of its declaration.",
        ex("type T = Pair(Int, Int)\nPair(1)", "type T = Pair(Int, Int)\nPair(1, 2)", "Supply every argument."),
    ),
    def(
        "VF4201", "No matching overload", Error, Typechecker, "externals",
        "no overload of `{name}` accepts these arguments",
        Some("candidates: {candidates}"),
        "None of the declared external signatures matches the argument types.",
        ex("parse(1)", "parse(\"1\")", "Call a declared signature."),
    ),
    def(
        "VF4202", "Not a function", Error, Typechecker, "application",
        "cannot call a value of type `{found}`",
        None,
        "Only functions can be applied to arguments.",
        ex("let x = 1\nx(2)", "let f = (y) -> y\nf(2)", "Call a function."),
    ),
    def(
        "VF4203", "Tuple pattern arity mismatch", Error, Typechecker, "patterns",
        "tuple pattern has {found} elements, but the scrutinee is a {expected}-tuple",
        None,
        "A tuple pattern must name every element of the tuple.",
        ex("match (1, 2) { (a) => a }", "match (1, 2) { (a, b) => a }", "Match every element."),
    ),
    def(
        "VF4204", "Pattern on non-variant", Error, Typechecker, "patterns",
        "constructor pattern `{ctor}` cannot match a value of type `{found}`",
        None,
        "Constructor patterns only match values of the constructor's variant type.",
        ex("match 1 { Some(x) => x }", "match opt { Some(x) => x, None => 0 }", "Match the right value."),
    ),
    def(
        "VF4205", "Ambiguous overload", Error, Typechecker, "externals",
        "multiple overloads of `{name}` accept these arguments",
        Some("add a type annotation to disambiguate"),
        "More than one declared external signature matches; the call must be disambiguated.",
        ex("let x = read(v)", "let x: Int = read(v)", "Annotate the expected type."),
    ),
    // ── Type checker: occurs / levels ───────────────────────────────────
    def(
        "VF4300", "Infinite type", Error, Typechecker, "unification",
        "cannot construct the infinite type `{var} = {ty}`",
        Some("a value cannot contain itself; check recursive uses"),
        "Unification would bind a type variable to a type containing that same variable.",
        ex("let f = (x) -> x(x)", "let f = (x) -> x", "Avoid self-application."),
    ),
    def(
        "VF4301", "Type variable escapes", Error, Typechecker, "unification",
        "type variable `{var}` escapes its scope",
        None,
        "A type variable introduced in an inner scope leaked into an outer type.",
        ex("(inner variable in outer type)", "(scoped use)", "Keep inner types local."),
    ),
    // ── Type checker: patterns & exhaustiveness ─────────────────────────
    def(
        "VF4400", "Non-exhaustive match", Error, Typechecker, "exhaustiveness",
        "match is not exhaustive; missing cases: {missing}",
        Some("add the missing cases or a wildcard `_` case"),
        "Every value of the scrutinee's type must be covered by some arm, ignoring guards.",
        ex(
            "type Color = Red | Green | Blue\nmatch c { Red => 1, Green => 2 }",
            "type Color = Red | Green | Blue\nmatch c { Red => 1, Green => 2, Blue => 3 }",
            "Cover every constructor.",
        ),
    ),
    def(
        "VF4401", "Guard is not Bool", Error, Typechecker, "patterns",
        "match guard must be `Bool`, found `{found}`",
        None,
        "The `if` guard of a match arm is a boolean condition.",
        ex("match n { x if x => 1, _ => 0 }", "match n { x if x > 0 => 1, _ => 0 }", "Write a boolean guard."),
    ),
    def(
        "VF4402", "Duplicate pattern binding", Error, Typechecker, "patterns",
        "`{name}` is bound more than once in this pattern",
        None,
        "Each variable may appear once per pattern; patterns are linear.",
        ex("match p { (x, x) => x }", "match p { (x, y) => x }", "Use distinct names."),
    ),
    def(
        "VF4403", "Literal pattern mismatch", Error, Typechecker, "patterns",
        "literal pattern has type `{found}`, but the scrutinee has type `{expected}`",
        None,
        "A literal pattern matches only values of the literal's type.",
        ex("match \"s\" { 1 => 0, _ => 1 }", "match \"s\" { \"s\" => 0, _ => 1 }", "Match a literal of the right type."),
    ),
    // ── Type checker: records ───────────────────────────────────────────
    def(
        "VF4500", "Field access on non-record", Error, Typechecker, "records",
        "type `{found}` has no fields",
        None,
        "Only records support `.field` access.",
        ex("let x = 1.y", "let x = { y: 1 }.y", "Access a field of a record."),
    ),
    def(
        "VF4501", "Missing record field", Error, Typechecker, "records",
        "record type `{record}` has no field `{field}`",
        None,
        "The record's type does not define the requested field.",
        ex("{ x: 1 }.y", "{ x: 1, y: 2 }.y", "Access an existing field."),
    ),
    def(
        "VF4502", "Update of non-record", Error, Typechecker, "records",
        "record update requires a record, found `{found}`",
        None,
        "`{ ...base, field: v }` updates fields of an existing record value.",
        ex("{ ...1, x: 2 }", "{ ...point, x: 2 }", "Update a record value."),
    ),
    // ── Type checker: variants ──────────────────────────────────────────
    def(
        "VF4600", "Unknown constructor", Error, Typechecker, "variants",
        "constructor `{ctor}` is not defined",
        Some("did you mean `{suggestion}`?"),
        "The name is not a constructor of any variant type in scope.",
        ex("let x = Soem(1)", "let x = Some(1)", "Fix the spelling."),
    ),
    def(
        "VF4601", "Unknown variant type", Error, Typechecker, "variants",
        "variant type `{name}` is not defined",
        None,
        "The name does not refer to a declared variant type.",
        ex("match x: Shape { }", "type Shape = Dot\nmatch x { Dot => 1 }", "Declare the type first."),
    ),
    def(
        "VF4602", "Variant identity mismatch", Error, Typechecker, "variants",
        "constructor `{ctor}` belongs to `{expected}`, not `{found}`",
        None,
        "A constructor can only build or match values of its own declared type.",
        ex(
            "type A = X\ntype B = Y\nmatch (a: A) { Y => 1 }",
            "type A = X\nmatch (a: A) { X => 1 }",
            "Match constructors of the scrutinee's type.",
        ),
    ),
    // ── Type checker: refs ──────────────────────────────────────────────
    def(
        "VF4700", "Dereference of non-Ref", Error, Typechecker, "refs",
        "`!` requires a `Ref`, found `{found}`",
        None,
        "Dereference reads the current value out of a reference cell.",
        ex("let x = 1\nx!", "let mutable x = 1\nx!", "Dereference a `Ref`."),
    ),
    def(
        "VF4701", "Assignment to non-Ref", Error, Typechecker, "refs",
        "`:=` requires a `Ref` on the left, found `{found}`",
        Some("declare the binding with `let mutable`"),
        "Only reference cells can be assigned to; plain bindings are immutable.",
        ex("let x = 1\nx := 2", "let mutable x = 1\nx := 2", "Make the binding mutable."),
    ),
    // ── Type checker: externals ─────────────────────────────────────────
    def(
        "VF4800", "Conflicting external", Error, Typechecker, "externals",
        "external `{name}` conflicts with an existing binding",
        None,
        "An external can only overload other externals of the same name, not ordinary bindings.",
        ex("let f = 1\nexternal f: Int -> Int = \"f\"", "external f: Int -> Int = \"f\"", "Rename one of the two."),
    ),
    def(
        "VF4801", "Overload is not a function", Error, Typechecker, "externals",
        "overloaded external `{name}` must have a function type",
        None,
        "Only function-typed externals can participate in overload resolution.",
        ex("external pi: Float = \"PI\"\nexternal pi: Int = \"PI\"", "external pi: Float = \"PI\"", "Overload functions only."),
    ),
    def(
        "VF4802", "External type redefined", Error, Typechecker, "externals",
        "external type `{name}` is already defined",
        None,
        "Each external type name may be declared once per module.",
        ex("external type T\nexternal type T", "external type T", "Remove the duplicate."),
    ),
    def(
        "VF4803", "Invalid JS name", Error, Typechecker, "externals",
        "`{jsName}` is not a valid JavaScript identifier path",
        None,
        "External bindings name the JavaScript entity they compile to.",
        ex("external f: Int -> Int = \"1bad\"", "external f: Int -> Int = \"good\"", "Use a valid identifier."),
    ),
    def(
        "VF4804", "Export of unknown binding", Error, Typechecker, "externals",
        "cannot export `{name}`: it is not defined in this module",
        None,
        "Exports re-expose bindings declared in the same module.",
        ex("export { missing }", "let present = 1\nexport { present }", "Export a declared name."),
    ),
    def(
        "VF4900", "Unreachable match arm", Warning, Typechecker, "exhaustiveness",
        "this match arm is unreachable; previous arms already cover it",
        None,
        "Earlier patterns match every value this arm could match, so it never runs.",
        ex(
            "match b { _ => 0, true => 1 }",
            "match b { true => 1, _ => 0 }",
            "Order arms from specific to general.",
        ),
    ),
    // ── Modules ─────────────────────────────────────────────────────────
    def(
        "VF5000", "Module not found", Error, Modules, "resolution",
        "cannot resolve `{specifier}` from `{from}`",
        Some("did you mean `{suggestion}`?"),
        "No file matches the import specifier after applying the resolution rules.",
        ex("import { f } from \"./utls\"", "import { f } from \"./utils\"", "Fix the path."),
    ),
    def(
        "VF5001", "Module read error", Error, Modules, "resolution",
        "cannot read `{path}`: {reason}",
        None,
        "The file exists in the graph but could not be read.",
        ex("(unreadable file)", "(readable file)", "Check file permissions."),
    ),
    def(
        "VF5002", "Circular symlink", Error, Modules, "resolution",
        "`{path}` resolves through a circular symlink chain",
        None,
        "Symlinks are resolved to real paths; a symlink cycle has no real path.",
        ex("a.vf -> b.vf -> a.vf", "a.vf (regular file)", "Remove the symlink cycle."),
    ),
    def(
        "VF5003", "Unsupported import specifier", Error, Modules, "resolution",
        "`{specifier}` is not a supported import specifier",
        Some("imports must be relative, absolute, or bare `.vf` module paths"),
        "URLs and files with non-`.vf` extensions cannot be imported.",
        ex("import { f } from \"https://x.dev/m\"", "import { f } from \"./m\"", "Import a local module."),
    ),
    related(def(
        "VF5004", "Self import", Error, Modules, "cycles",
        "module `{path}` imports itself",
        None,
        "A module importing itself is never useful and is always an error.",
        ex("// in a.vf\nimport { x } from \"./a\"", "// in a.vf\nlet x = 1", "Remove the self import."),
    ), &["VF5900"]),
    def(
        "VF5005", "Invalid entry point", Error, Modules, "resolution",
        "`{path}` is not a valid entry point",
        Some("tried: {tried}"),
        "The entry point must be a `.vf` file or a directory containing `index.vf`.",
        ex("vibefunc check src/", "vibefunc check src/index.vf", "Point at a module file."),
    ),
    def(
        "VF5100", "Malformed config", Error, Modules, "config",
        "cannot parse `{path}`: {reason}",
        None,
        "`vibefun.json` must be valid JSON matching the documented shape.",
        ex("{ \"compilerOptions\": ", "{ \"compilerOptions\": {} }", "Fix the JSON."),
    ),
    def(
        "VF5101", "Import name not found", Error, Modules, "resolution",
        "`{name}` is not exported by `{path}`",
        Some("available exports: {available}"),
        "The imported name is not in the target module's export list.",
        ex("import { missing } from \"./m\"", "import { present } from \"./m\"", "Import an exported name."),
    ),
    def(
        "VF5102", "Duplicate import", Error, Modules, "resolution",
        "`{name}` is imported more than once",
        None,
        "A name can be introduced by at most one import.",
        ex(
            "import { f } from \"./a\"\nimport { f } from \"./b\"",
            "import { f } from \"./a\"\nimport { f as g } from \"./b\"",
            "Alias one of the imports.",
        ),
    ),
    related(def(
        "VF5900", "Circular dependency", Warning, Modules, "cycles",
        "circular dependency: {cycle}",
        Some("break the cycle or make the imports type-only"),
        "Modules in a value cycle have an unspecified initialization order. Cycles whose edges are all type-only are safe and not reported.",
        ex(
            "// a.vf imports b.vf, b.vf imports a.vf",
            "// move the shared definitions into c.vf",
            "Extract the shared parts into a third module.",
        ),
    ), &["VF5004"]),
    def(
        "VF5901", "Case mismatch", Warning, Modules, "resolution",
        "import `{specifier}` differs from the on-disk name `{actual}` only by case",
        Some("case-insensitive file systems will resolve this; case-sensitive ones will not"),
        "An import that works on one file system and fails on another is a portability bug.",
        ex("import { f } from \"./Utils\"", "import { f } from \"./utils\"", "Match the on-disk casing."),
    ),
];
