use std::rc::Rc;

use criterion::{Criterion, criterion_group, criterion_main};
use regcalc::{BitLength, Document, Register};

fn gen_document(field_count: usize, observers: usize) -> Document {
    let mut doc = Document::new(Register::new(0, BitLength::Bits32, true));

    for i in 0..field_count {
        let end = (i * 4 % 32) as i64;
        doc.add_field(end + 3, end, format!("f{}", i)).unwrap();
    }

    for i in 0..observers.min(field_count) {
        let register = Rc::clone(doc.register());
        let range = doc.field(i).unwrap().range();
        doc.observe_field(
            i,
            Rc::new(move || {
                let field = regcalc::Field::from_range(&register, range);
                let _ = field.bits().map(|bits| bits.bin_delimited());
            }),
        );
    }

    doc
}

fn bench_field_write(c: &mut Criterion) {
    for &field_count in &[1usize, 8, 32] {
        let doc = gen_document(field_count, field_count);

        c.bench_function(&format!("write_with_{}_observers", field_count), |b| {
            let mut value = 0u64;
            b.iter(|| {
                value = (value + 1) & 0xF;
                doc.field(0).unwrap().set_value(value).unwrap();
            })
        });
    }
}

fn bench_render(c: &mut Criterion) {
    let reg = Register::with_value(0x1122_3344);

    c.bench_function("render_bin_delimited_32", |b| {
        b.iter(|| reg.bits().bin_delimited())
    });
}

criterion_group!(benches, bench_field_write, bench_render);
criterion_main!(benches);
