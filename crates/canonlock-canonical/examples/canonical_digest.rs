use canonlock_canonical::Canonicalizer;

fn main() {
    let canonicalizer = Canonicalizer::new();
    let document = "\
# Rosetta

metadata:
  title: Rosetta
  integrity:
    sha256: \"pending\"
  author: council

Body text.
";

    let form = canonicalizer.canonicalize(document);
    for line in form.lines() {
        println!("{:>4} | {}", line.number, line.text);
    }
    println!(
        "retained {} of {} lines; sha256 {}",
        form.retained_lines(),
        form.total_lines(),
        form.digest()
    );
}
