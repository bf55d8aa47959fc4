use anyhow::Result;
use blade_function::config::DirectivesConfig;
use blade_function::{
    DirectiveHost, FragmentEmitter, Handler, Target, TemplateCompiler, TemplateError,
    TranspileError, extract, transpile,
};
use pretty_assertions::assert_eq;

fn pseudo_compiler() -> TemplateCompiler {
    TemplateCompiler::new(FragmentEmitter::new(Target::Pseudo), &DirectivesConfig::default())
}

#[test]
fn test_extract_examples() -> Result<()> {
    let foo = extract("foo(a, b)")?;
    assert_eq!((foo.name.as_str(), foo.params.as_str()), ("foo", "a, b"));

    let bare = extract("foo")?;
    assert_eq!((bare.name.as_str(), bare.params.as_str()), ("foo", ""));

    assert!(matches!(
        extract("123abc"),
        Err(TranspileError::InvalidFunctionName { expression }) if expression == "123abc"
    ));
    Ok(())
}

#[test]
fn test_greet_example_in_php() -> Result<()> {
    let template = r#"@function(greet($name))
<p>Hello, {{ $name }}!</p>
@endfunction

@greet('world')
@greet()
"#;

    let compiled = transpile(template)?;
    assert_eq!(
        compiled,
        r#"<?php function greet ( $name ,   $__env ) { ?>
<p>Hello, {{ $name }}!</p>
<?php } ?>

<?php greet ('world' ,  $__env); ?>
<?php greet ( $__env); ?>
"#
    );
    Ok(())
}

#[test]
fn test_noop_declaration_takes_only_context() -> Result<()> {
    let compiled = pseudo_compiler().compile("@function(noop)@endfunction")?;
    assert_eq!(compiled, "BEGIN_FUNC noop ( ctx )END_FUNC");
    Ok(())
}

#[test]
fn test_declaration_call_and_close_form_one_definition() -> Result<()> {
    let names = ["f", "_private", "render2", "ünïcode", "Table_Row"];
    let params = ["", "a", "a, b", "$x = [1, 2]", " spaced ", "'('"];
    let args = ["", "1", "'a', 'b'", "f(g(h))", "  padded  "];

    for name in names {
        for param in params {
            for arg in args {
                let template = format!("@function({name}({param})) body @endfunction @{name}({arg})");
                let compiled = pseudo_compiler().compile(&template)?;

                let expected_params = match param.trim() {
                    "" => String::new(),
                    p => format!("{p} , "),
                };
                let expected_args = match arg.trim() {
                    "" => String::new(),
                    a => format!("{a} , "),
                };
                assert_eq!(
                    compiled,
                    format!(
                        "BEGIN_FUNC {name} ( {expected_params}ctx ) body END_FUNC CALL {name} ( {expected_args}ctx )"
                    ),
                    "template: {template}"
                );
            }
        }
    }
    Ok(())
}

#[test]
fn test_last_declaration_wins() -> Result<()> {
    let mut compiler = pseudo_compiler();
    compiler.compile("@function(card($title))@endfunction")?;
    compiler.compile("@function(card)@endfunction")?;

    assert_eq!(compiler.registry().declared_functions(), vec!["card"]);
    let compiled = compiler.compile("@card('x')")?;
    assert_eq!(compiled, "CALL card ( 'x' , ctx )");
    Ok(())
}

#[test]
fn test_invalid_declaration_aborts_compile() {
    let err = transpile("ok\n@function(9lives)\n@endfunction").unwrap_err();
    let TemplateError::Directive { line, source, .. } = err;
    assert_eq!(line, 2);
    assert_eq!(
        source,
        TranspileError::InvalidFunctionName {
            expression: "9lives".to_string()
        }
    );
}

#[test]
fn test_nested_declarations_close_innermost() -> Result<()> {
    let template = "@function(outer)@function(inner($x))@endfunction @endfunction";
    let compiled = pseudo_compiler().compile(template)?;
    assert_eq!(
        compiled,
        "BEGIN_FUNC outer ( ctx )BEGIN_FUNC inner ( $x , ctx )END_FUNC END_FUNC"
    );
    Ok(())
}

#[test]
fn test_host_supplied_custom_directive() -> Result<()> {
    let mut compiler =
        TemplateCompiler::new(FragmentEmitter::default(), &DirectivesConfig::default());
    compiler.registry_mut().register_directive(
        "datetime",
        Handler::custom(|e| format!("<?php echo ({e})->format('Y-m-d'); ?>")),
    );

    let compiled = compiler.compile("@datetime($post->created_at)")?;
    assert_eq!(compiled, "<?php echo ($post->created_at)->format('Y-m-d'); ?>");
    Ok(())
}
