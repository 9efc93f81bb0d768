use spacetree::{debug, tokens, Tree, Value};

fn main() {
    env_logger::init();
    println!("T O M L !");

    let simple = r#"

    [ hello  ] # lol
    a =    2#3
    b = "hello world"

    [ bob. "something" ]
    flt7 = 6.626e-34
    bool = false # it's true though!
    arr = [ 1, 2   ,    3
    ,]

    inline = { alice = "some", key = 2 }

    multi = """\
    Hello World!
    This is \"multiline\"!\
    """

    date1 = 1979-05-27T07:32:00Z
    date2 = 1979-05-27T00:32:00-07:00
    date3 = 1979-05-27T00:32:00.999999-07:00

    "#;

    println!("Tokens:");
    for token in tokens(simple.as_bytes()) {
        println!("  {}: {:?} {:?}", token.position, token.kind, token.text);
    }

    let mut document = match spacetree::parse(simple) {
        Ok(document) => document,
        Err(err) => {
            println!("{}", debug::show_error(simple, &err));
            return;
        }
    };

    match document.get("hello") {
        Some(&Value::Table(_)) => {}
        other => println!("Unexpected value for 'hello': {:?}", other),
    }
    if let Err(err) = document.insert_path(&["hello", "test"], "value") {
        println!("Could not insert hello.test: {}", err);
    }
    if let Err(err) = document.insert_path(
        &["bob", "something", "Hello snorri"],
        "Would you care,\n for a cuppa\"\" value?",
    ) {
        println!("Could not insert into bob.something: {}", err);
    }

    let out = match document.to_text() {
        Ok(out) => out,
        Err(err) => {
            println!("Could not write the document: {}", err);
            return;
        }
    };
    println!("Written output:\n{}", out);

    match out.parse::<Tree>() {
        Ok(reparsed) if reparsed == document => println!("Written document reads back equal!"),
        Ok(_) => println!("Written document reads back different!"),
        Err(err) => println!("{}", debug::show_error(&out, &err)),
    }

    let bad = "foo = 42.";
    if let Err(err) = spacetree::parse(bad) {
        println!("{}", debug::show_error(bad, &err));
    }
}
