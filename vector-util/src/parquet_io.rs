use ndarray::Array2;
use parquet::basic::Type as ParquetType;
use parquet::basic::{Compression, ConvertedType, Repetition, ZstdLevel};
use parquet::data_type::{ByteArray, ByteArrayType, FloatType};
use parquet::file::properties::WriterProperties;
use parquet::file::reader::{FileReader, SerializedFileReader};
use parquet::file::writer::SerializedFileWriter;
use parquet::record::RowAccessor;
use parquet::schema::types::Type;
use std::fs::File;
use std::sync::Arc;

/// Write a dense feature matrix (`n x d`, one row vector per item) to
/// a parquet file with zstd compression. The first column keeps the
/// row names; the remaining `d` columns are 32-bit floats, so a
/// read-back returns bit-identical values.
///
/// * `file_path` - output file path
/// * `x_nd` - feature matrix (`n x d`)
/// * `row_names` - one name per row; if `None`, use `[0, n)` numbers
pub fn write_feature_matrix(
    file_path: &str,
    x_nd: &Array2<f32>,
    row_names: Option<&[Box<str>]>,
) -> anyhow::Result<()> {
    let (nrows, ncols) = (x_nd.nrows(), x_nd.ncols());

    if let Some(names) = row_names {
        if names.len() != nrows {
            return Err(anyhow::anyhow!(
                "row names length ({}) does not match number of rows ({})",
                names.len(),
                nrows
            ));
        }
    }

    let schema = build_feature_schema(ncols)?;

    let zstd_level = ZstdLevel::try_new(5)?;
    let writer_properties = Arc::new(
        WriterProperties::builder()
            .set_compression(Compression::ZSTD(zstd_level))
            .build(),
    );

    let row_names: Vec<ByteArray> = match row_names {
        Some(row_names) => row_names
            .iter()
            .map(|r| ByteArray::from(r.as_ref()))
            .collect(),
        None => (0..nrows)
            .map(|i| ByteArray::from(i.to_string().as_bytes()))
            .collect(),
    };

    let file = File::create(file_path)?;
    let mut writer = SerializedFileWriter::new(file, schema, writer_properties)?;
    let mut row_group = writer.next_row_group()?;

    if let Some(mut column) = row_group.next_column()? {
        column
            .typed::<ByteArrayType>()
            .write_batch(&row_names, None, None)?;
        column.close()?;
    }

    for j in 0..ncols {
        let x_j: Vec<f32> = x_nd.column(j).iter().copied().collect();
        if let Some(mut column) = row_group.next_column()? {
            column.typed::<FloatType>().write_batch(&x_j, None, None)?;
            column.close()?;
        }
    }

    row_group.close()?;
    writer.close()?;
    Ok(())
}

/// Read back a feature matrix written by `write_feature_matrix`
///
/// # Returns `(x_nd, row_names)`
pub fn read_feature_matrix(file_path: &str) -> anyhow::Result<(Array2<f32>, Vec<Box<str>>)> {
    let file = File::open(file_path)?;
    let reader = SerializedFileReader::new(file)?;
    let metadata = reader.metadata();
    let nrows = metadata.file_metadata().num_rows() as usize;
    let nfields = metadata.file_metadata().schema().get_fields().len();

    if nfields < 2 {
        return Err(anyhow::anyhow!(
            "expected a row-name column and at least one feature column"
        ));
    }

    let ncols = nfields - 1;

    let mut row_names: Vec<Box<str>> = Vec::with_capacity(nrows);
    let mut row_major_data: Vec<f32> = Vec::with_capacity(nrows * ncols);

    for record in reader.get_row_iter(None)? {
        let row = record?;
        row_names.push(row.get_string(0)?.clone().into_boxed_str());
        for j in 1..=ncols {
            row_major_data.push(row.get_float(j)?);
        }
    }

    let x_nd = Array2::from_shape_vec((nrows, ncols), row_major_data)?;
    Ok((x_nd, row_names))
}

fn build_feature_schema(ncols: usize) -> anyhow::Result<Arc<Type>> {
    let mut fields = vec![Arc::new(
        Type::primitive_type_builder("row", ParquetType::BYTE_ARRAY)
            .with_repetition(Repetition::REQUIRED)
            .with_converted_type(ConvertedType::UTF8)
            .build()?,
    )];

    for j in 0..ncols {
        let name = format!("f{}", j);
        fields.push(Arc::new(
            Type::primitive_type_builder(&name, ParquetType::FLOAT)
                .with_repetition(Repetition::REQUIRED)
                .build()?,
        ));
    }

    let schema = Arc::new(
        Type::group_type_builder("featureMatrix")
            .with_fields(fields)
            .build()?,
    );

    Ok(schema)
}
