use criterion::{Criterion, criterion_group, criterion_main};
use ups_monitor_power_device_report::{
    ButtonCapability, CapabilityTable, CollectionCaps, ReportType, UsageRef, ValueCapability,
};

fn sample_table() -> CapabilityTable {
    let mut table = CapabilityTable::new(CollectionCaps {
        usage_page: 0x0084,
        usage: 0x0004,
        input_len: 6,
        output_len: 0,
        feature_len: 0,
    });
    table.push_value(
        ReportType::Input,
        ValueCapability {
            usage_page: 0x0085,
            usage_ref: UsageRef::Single(0x0066),
            report_id: 1,
            bit_offset: 0,
            bit_size: 8,
            report_count: 1,
            logical_min: 0,
            logical_max: 100,
            physical_min: 0,
            physical_max: 0,
            is_absolute: true,
            has_null: false,
        },
    );
    table.push_value(
        ReportType::Input,
        ValueCapability {
            usage_page: 0x0084,
            usage_ref: UsageRef::Range {
                usage_min: 0x0030,
                usage_max: 0x0032,
            },
            report_id: 1,
            bit_offset: 8,
            bit_size: 8,
            report_count: 3,
            logical_min: 0,
            logical_max: 255,
            physical_min: 0,
            physical_max: 0,
            is_absolute: true,
            has_null: false,
        },
    );
    table.push_button(
        ReportType::Input,
        ButtonCapability {
            usage_page: 0x0084,
            usage_ref: UsageRef::Range {
                usage_min: 0x0042,
                usage_max: 0x0046,
            },
            report_id: 1,
            bit_offset: 32,
        },
    );
    table
}

fn benchmark_value_decode(c: &mut Criterion) {
    let table = sample_table();
    let raw = [0x01u8, 75, 230, 5, 50, 0x00];

    c.bench_function("decode_report values", |b| {
        b.iter(|| {
            std::hint::black_box(table.decode(ReportType::Input, std::hint::black_box(&raw)))
        });
    });
}

fn benchmark_button_decode(c: &mut Criterion) {
    let table = sample_table();
    let raw = [0x01u8, 0, 0, 0, 0, 0b0001_0101];

    c.bench_function("decode_report buttons", |b| {
        b.iter(|| {
            std::hint::black_box(table.decode(ReportType::Input, std::hint::black_box(&raw)))
        });
    });
}

criterion_group!(benches, benchmark_value_decode, benchmark_button_decode);
criterion_main!(benches);
